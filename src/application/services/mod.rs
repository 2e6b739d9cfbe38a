//! Business logic services, one per engine component

pub mod charging;
pub mod dispatch;
pub mod earnings;
pub mod order;
pub mod payments;

#[cfg(test)]
mod tests;

pub use charging::ChargingService;
pub use dispatch::DispatchService;
pub use earnings::EarningsService;
pub use order::OrderService;
pub use payments::PaymentSyncService;

use crate::domain::pricing::{Coordinates, PricingConfig};

/// Who is issuing a command. Resolved by the auth layer; services trust it.
#[derive(Debug, Clone)]
pub enum Actor {
    Customer(String),
    Driver(String),
    Admin,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin)
    }
}

/// Pricing inputs shared by both order aggregates: the fee schedule plus
/// the company origin the delivery distance is measured from.
#[derive(Debug, Clone)]
pub struct PricingContext {
    pub config: PricingConfig,
    pub origin: Coordinates,
    /// Forwarded to the tax function; reserved for a future
    /// per-jurisdiction table
    pub state_code: Option<String>,
}
