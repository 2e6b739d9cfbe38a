//! SeaORM implementation of AddressRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::address::{Address, AddressRepository};
use crate::domain::pricing::Coordinates;
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::address;

use super::{db_err, not_found};

pub struct SeaOrmAddressRepository {
    db: DatabaseConnection,
}

impl SeaOrmAddressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(a: address::Model) -> Address {
    Address {
        id: a.id,
        customer_id: a.customer_id,
        label: a.label,
        street: a.street,
        city: a.city,
        state_code: a.state_code,
        postal_code: a.postal_code,
        coordinates: match (a.lat, a.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        },
        created_at: a.created_at,
        updated_at: a.updated_at,
    }
}

#[async_trait]
impl AddressRepository for SeaOrmAddressRepository {
    async fn insert(&self, a: Address) -> DomainResult<Address> {
        address::ActiveModel {
            id: Set(a.id.clone()),
            customer_id: Set(a.customer_id.clone()),
            label: Set(a.label.clone()),
            street: Set(a.street.clone()),
            city: Set(a.city.clone()),
            state_code: Set(a.state_code.clone()),
            postal_code: Set(a.postal_code.clone()),
            lat: Set(a.coordinates.map(|c| c.lat)),
            lon: Set(a.coordinates.map(|c| c.lon)),
            created_at: Set(a.created_at),
            updated_at: Set(a.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(a)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Address>> {
        let model = address::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_customer(&self, customer_id: &str) -> DomainResult<Vec<Address>> {
        let models = address::Entity::find()
            .filter(address::Column::CustomerId.eq(customer_id))
            .order_by_asc(address::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = address::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(not_found("Address", id));
        }
        Ok(())
    }
}
