//! Repository provider trait
//!
//! One handle bundling the per-aggregate repositories, injected into
//! services so they never touch the connection pool directly.

use crate::domain::address::AddressRepository;
use crate::domain::car::CarRepository;
use crate::domain::charging_order::ChargingOrderRepository;
use crate::domain::driver::DriverRepository;
use crate::domain::order::OrderRepository;
use crate::domain::payout::PayoutRepository;
use crate::domain::product::ProductRepository;

/// Unified accessor for the per-aggregate repositories.
pub trait RepositoryProvider: Send + Sync {
    fn orders(&self) -> &dyn OrderRepository;
    fn charging_orders(&self) -> &dyn ChargingOrderRepository;
    fn drivers(&self) -> &dyn DriverRepository;
    fn payouts(&self) -> &dyn PayoutRepository;
    fn addresses(&self) -> &dyn AddressRepository;
    fn products(&self) -> &dyn ProductRepository;
    fn cars(&self) -> &dyn CarRepository;
}
