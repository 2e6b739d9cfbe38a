//! Domain error taxonomy shared by every aggregate and service.

use rust_decimal::Decimal;
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Quantity {quantity} liters is outside the allowed range [{min}, {max}]")]
    InvalidQuantity { quantity: i32, min: i32, max: i32 },

    #[error("Address {0} has no resolved coordinates")]
    AddressNotGeocoded(String),

    #[error("Order in status {status} can no longer be cancelled by the customer")]
    IllegalCancellation { status: String },

    #[error("Illegal status transition {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Driver {0} is unavailable")]
    DriverUnavailable(String),

    #[error("Requested payout {requested} exceeds available balance {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("External service failure: {0}")]
    ExternalService(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    /// Whether this error is likely transient (DB connection lost,
    /// order-number uniqueness collision) and the operation may succeed
    /// if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            DomainError::Database(_) => true,
            DomainError::Conflict(msg) => msg.contains("order number"),
            _ => false,
        }
    }
}
