//! SeaORM repository implementations

pub mod address_repository;
pub mod car_repository;
pub mod charging_order_repository;
pub mod driver_repository;
pub mod order_repository;
pub mod payout_repository;
pub mod product_repository;
pub mod repository_provider;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Insert-specific error mapping: unique-constraint violations become
/// `Conflict` naming the duplicated field so callers can retry with a
/// regenerated value.
fn insert_err(e: sea_orm::DbErr, unique_field: &str) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("unique") || msg.contains("Duplicate") {
        DomainError::Conflict(format!("Duplicate {}", unique_field))
    } else {
        DomainError::Database(msg)
    }
}

fn not_found(entity: &'static str, id: &str) -> DomainError {
    DomainError::NotFound {
        entity,
        field: "id",
        value: id.to_string(),
    }
}
