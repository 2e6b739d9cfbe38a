//! SeaORM implementation of DriverRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder, Set,
};
use tracing::debug;

use crate::domain::driver::{Driver, DriverLocation, DriverRepository};
use crate::domain::pricing::Coordinates;
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{driver, driver_location};

use super::{db_err, not_found};

pub struct SeaOrmDriverRepository {
    db: DatabaseConnection,
}

impl SeaOrmDriverRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(d: driver::Model) -> Driver {
    Driver {
        id: d.id,
        name: d.name,
        phone: d.phone,
        vehicle_make: d.vehicle_make,
        vehicle_model: d.vehicle_model,
        vehicle_plate: d.vehicle_plate,
        is_available: d.is_available,
        is_active: d.is_active,
        payout_account_id: d.payout_account_id,
        created_at: d.created_at,
        updated_at: d.updated_at,
    }
}

fn domain_to_active(d: &Driver) -> driver::ActiveModel {
    driver::ActiveModel {
        id: Set(d.id.clone()),
        name: Set(d.name.clone()),
        phone: Set(d.phone.clone()),
        vehicle_make: Set(d.vehicle_make.clone()),
        vehicle_model: Set(d.vehicle_model.clone()),
        vehicle_plate: Set(d.vehicle_plate.clone()),
        is_available: Set(d.is_available),
        is_active: Set(d.is_active),
        payout_account_id: Set(d.payout_account_id.clone()),
        created_at: Set(d.created_at),
        updated_at: Set(d.updated_at),
    }
}

/// Load a driver inside an assignment transaction. Shared by the two
/// order repositories so the availability check happens on the same
/// connection as the order write.
pub(super) async fn find_dispatchable<C: ConnectionTrait>(
    conn: &C,
    driver_id: &str,
) -> DomainResult<Driver> {
    let model = driver::Entity::find_by_id(driver_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| not_found("Driver", driver_id))?;
    Ok(model_to_domain(model))
}

// ── DriverRepository impl ───────────────────────────────────────

#[async_trait]
impl DriverRepository for SeaOrmDriverRepository {
    async fn insert(&self, d: Driver) -> DomainResult<Driver> {
        debug!(driver_id = %d.id, "Inserting driver");
        domain_to_active(&d).insert(&self.db).await.map_err(db_err)?;
        Ok(d)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Driver>> {
        let model = driver::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, d: &Driver) -> DomainResult<()> {
        let existing = driver::Entity::find_by_id(&d.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(not_found("Driver", &d.id));
        }
        domain_to_active(d).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(&self, page: u64, limit: u64) -> DomainResult<(Vec<Driver>, u64)> {
        let paginator = driver::Entity::find()
            .order_by_asc(driver::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn set_availability(&self, driver_id: &str, available: bool) -> DomainResult<()> {
        let model = driver::Entity::find_by_id(driver_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| not_found("Driver", driver_id))?;

        let mut active: driver::ActiveModel = model.into();
        active.is_available = Set(available);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn upsert_location(&self, location: DriverLocation) -> DomainResult<()> {
        let active = driver_location::ActiveModel {
            driver_id: Set(location.driver_id.clone()),
            lat: Set(location.position.lat),
            lon: Set(location.position.lon),
            accuracy: Set(location.accuracy),
            heading: Set(location.heading),
            speed: Set(location.speed),
            updated_at: Set(location.updated_at),
        };

        // Latest-wins single row per driver
        let existing = driver_location::Entity::find_by_id(&location.driver_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            active.update(&self.db).await.map_err(db_err)?;
        } else {
            active.insert(&self.db).await.map_err(db_err)?;
        }
        Ok(())
    }

    async fn find_location(&self, driver_id: &str) -> DomainResult<Option<DriverLocation>> {
        let model = driver_location::Entity::find_by_id(driver_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|l| DriverLocation {
            driver_id: l.driver_id,
            position: Coordinates {
                lat: l.lat,
                lon: l.lon,
            },
            accuracy: l.accuracy,
            heading: l.heading,
            speed: l.speed,
            updated_at: l.updated_at,
        }))
    }
}
