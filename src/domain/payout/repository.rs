//! Payout ledger repository trait

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::{DriverPayout, PayoutStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait PayoutRepository: Send + Sync {
    /// Insert a PENDING ledger row, validating the amount against the
    /// balance inside the same transaction: the in-flight and succeeded
    /// payout sum is recomputed under the transaction, so two
    /// concurrent requests cannot both draw on one balance.
    ///
    /// `total_earned` is the accrued earnings computed just before the
    /// call; earnings only ever grow, so a stale figure is conservative.
    /// Fails with `InsufficientBalance` without writing a row.
    async fn reserve(
        &self,
        payout: DriverPayout,
        total_earned: Decimal,
    ) -> DomainResult<DriverPayout>;

    /// Finalize a PENDING row exactly once with the transfer outcome.
    async fn finalize(
        &self,
        payout_id: &str,
        status: PayoutStatus,
        external_transfer_id: Option<String>,
        failure_reason: Option<String>,
    ) -> DomainResult<DriverPayout>;

    async fn list_for_driver(&self, driver_id: &str) -> DomainResult<Vec<DriverPayout>>;

    /// Sum of SUCCEEDED payouts.
    async fn total_paid_out(&self, driver_id: &str) -> DomainResult<Decimal>;
}
