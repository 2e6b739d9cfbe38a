//! SeaORM implementation of PayoutRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::domain::payout::{DriverPayout, PayoutRepository, PayoutStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{driver, driver_payout};

use super::{db_err, not_found};

pub struct SeaOrmPayoutRepository {
    db: DatabaseConnection,
}

impl SeaOrmPayoutRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(p: driver_payout::Model) -> DomainResult<DriverPayout> {
    Ok(DriverPayout {
        id: p.id,
        driver_id: p.driver_id,
        amount: p.amount,
        status: PayoutStatus::parse(&p.status)
            .ok_or_else(|| DomainError::Database(format!("Unknown payout status {}", p.status)))?,
        external_transfer_id: p.external_transfer_id,
        failure_reason: p.failure_reason,
        created_at: p.created_at,
        updated_at: p.updated_at,
    })
}

// ── PayoutRepository impl ───────────────────────────────────────

#[async_trait]
impl PayoutRepository for SeaOrmPayoutRepository {
    async fn reserve(
        &self,
        payout: DriverPayout,
        total_earned: Decimal,
    ) -> DomainResult<DriverPayout> {
        debug!(driver_id = %payout.driver_id, amount = %payout.amount, "Reserving payout");

        let txn = self.db.begin().await.map_err(db_err)?;

        // Under READ COMMITTED two reservations could both read the old
        // sum; locking the driver row serializes them. SQLite has a
        // single writer and no FOR UPDATE.
        if txn.get_database_backend() == DbBackend::Postgres {
            driver::Entity::find_by_id(&payout.driver_id)
                .lock_exclusive()
                .one(&txn)
                .await
                .map_err(db_err)?;
        }

        // PENDING rows count as spoken-for while their transfer is in
        // flight; recomputing the sum under the transaction closes the
        // double-draw window
        let rows = driver_payout::Entity::find()
            .filter(driver_payout::Column::DriverId.eq(&payout.driver_id))
            .filter(
                driver_payout::Column::Status.is_in([
                    PayoutStatus::Pending.as_str(),
                    PayoutStatus::Succeeded.as_str(),
                ]),
            )
            .all(&txn)
            .await
            .map_err(db_err)?;
        let reserved: Decimal = rows.iter().map(|r| r.amount).sum();
        let available = (total_earned - reserved).max(Decimal::ZERO);
        if payout.amount > available {
            // Rolls back; no ledger row is written
            return Err(DomainError::InsufficientBalance {
                requested: payout.amount,
                available,
            });
        }

        driver_payout::ActiveModel {
            id: Set(payout.id.clone()),
            driver_id: Set(payout.driver_id.clone()),
            amount: Set(payout.amount),
            status: Set(payout.status.as_str().to_string()),
            external_transfer_id: Set(payout.external_transfer_id.clone()),
            failure_reason: Set(payout.failure_reason.clone()),
            created_at: Set(payout.created_at),
            updated_at: Set(payout.updated_at),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(payout)
    }

    async fn finalize(
        &self,
        payout_id: &str,
        status: PayoutStatus,
        external_transfer_id: Option<String>,
        failure_reason: Option<String>,
    ) -> DomainResult<DriverPayout> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = driver_payout::Entity::find_by_id(payout_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| not_found("DriverPayout", payout_id))?;
        if model.status != PayoutStatus::Pending.as_str() {
            return Err(DomainError::Conflict(format!(
                "Payout {} is already finalized",
                payout_id
            )));
        }

        let mut active: driver_payout::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.external_transfer_id = Set(external_transfer_id);
        active.failure_reason = Set(failure_reason);
        active.updated_at = Set(chrono::Utc::now());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        model_to_domain(updated)
    }

    async fn list_for_driver(&self, driver_id: &str) -> DomainResult<Vec<DriverPayout>> {
        let models = driver_payout::Entity::find()
            .filter(driver_payout::Column::DriverId.eq(driver_id))
            .order_by_desc(driver_payout::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn total_paid_out(&self, driver_id: &str) -> DomainResult<Decimal> {
        let models = driver_payout::Entity::find()
            .filter(driver_payout::Column::DriverId.eq(driver_id))
            .filter(driver_payout::Column::Status.eq(PayoutStatus::Succeeded.as_str()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.iter().map(|p| p.amount).sum())
    }
}
