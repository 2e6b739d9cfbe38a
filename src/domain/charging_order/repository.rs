//! Charging order repository trait

use async_trait::async_trait;

use super::model::{ChargingOrder, ChargingStatus};
use crate::domain::order::PaymentStatus;
use crate::domain::DomainResult;

#[async_trait]
pub trait ChargingOrderRepository: Send + Sync {
    /// Insert the order together with its car association rows,
    /// all-or-nothing. Duplicate order number yields `Conflict`
    /// mentioning "order number".
    async fn insert(&self, order: ChargingOrder) -> DomainResult<ChargingOrder>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargingOrder>>;

    /// Write the order only if its stored status still equals
    /// `expected`; `Conflict` when a concurrent writer won.
    async fn update_transition(
        &self,
        order: &ChargingOrder,
        expected: ChargingStatus,
    ) -> DomainResult<()>;

    /// Set the payment status alone, leaving the rest of the row as
    /// the store has it.
    async fn set_payment_status(&self, order_id: &str, status: PaymentStatus)
        -> DomainResult<()>;

    async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)>;

    async fn list_all(
        &self,
        status: Option<ChargingStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)>;

    /// Orders that count toward a driver's earnings
    /// (COMPLETED and PAID), newest completion first.
    async fn list_earning_for_driver(&self, driver_id: &str) -> DomainResult<Vec<ChargingOrder>>;

    /// Atomic driver (and optional charging unit) assignment; PENDING
    /// advances to ASSIGNED. Same transactional contract as the fuel
    /// order variant.
    async fn assign_driver(
        &self,
        order_id: &str,
        driver_id: &str,
        charging_unit_id: Option<&str>,
    ) -> DomainResult<ChargingOrder>;
}
