//! Fuel order repository trait

use async_trait::async_trait;

use super::model::{Order, OrderStatus, PaymentStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order together with its items, all-or-nothing.
    /// A duplicate order number yields `Conflict` mentioning
    /// "order number" so creation can regenerate and retry.
    async fn insert(&self, order: Order) -> DomainResult<Order>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>>;

    /// Write the order only if its stored status still equals
    /// `expected`. A concurrent writer that got there first leaves
    /// zero rows matched and yields `Conflict`.
    async fn update_transition(&self, order: &Order, expected: OrderStatus) -> DomainResult<()>;

    /// Set the payment status alone, leaving the rest of the row as
    /// the store has it.
    async fn set_payment_status(&self, order_id: &str, status: PaymentStatus)
        -> DomainResult<()>;

    async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)>;

    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)>;

    /// Orders that count toward a driver's earnings
    /// (DELIVERED and PAID), newest delivery first.
    async fn list_earning_for_driver(&self, driver_id: &str) -> DomainResult<Vec<Order>>;

    /// Atomically verify the driver is available and active, set the
    /// order's driver and advance PENDING to CONFIRMED. The availability
    /// check and the order write share one transaction so two
    /// concurrent assignments cannot both pass the check.
    async fn assign_driver(&self, order_id: &str, driver_id: &str) -> DomainResult<Order>;
}
