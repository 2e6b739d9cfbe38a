//! Driver earnings accrual and the payout ledger.
//!
//! Earnings are derived from order state at read time: delivery fee
//! plus tip over delivered-and-paid fuel orders and completed-and-paid
//! charging orders. The payout ledger is append-only; the balance check
//! and the PENDING reservation row share one repository transaction.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::payout::{
    DriverPayout, EarningEntry, EarningsSummary, PayoutStatus, RECENT_EARNINGS_LIMIT,
};
use crate::domain::{
    DomainError, DomainResult, PaymentGateway, RepositoryProvider, TransferOutcome,
};
use crate::notifications::{Event, SharedEventBus};

pub struct EarningsService {
    repos: Arc<dyn RepositoryProvider>,
    gateway: Arc<dyn PaymentGateway>,
    event_bus: SharedEventBus,
    min_payout: Decimal,
    currency: String,
}

impl EarningsService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<dyn PaymentGateway>,
        event_bus: SharedEventBus,
        min_payout: Decimal,
        currency: String,
    ) -> Self {
        Self {
            repos,
            gateway,
            event_bus,
            min_payout,
            currency,
        }
    }

    /// Derive the driver's earnings snapshot, including the most recent
    /// qualifying orders as a feed.
    pub async fn compute_earnings(&self, driver_id: &str) -> DomainResult<EarningsSummary> {
        let fuel = self.repos.orders().list_earning_for_driver(driver_id).await?;
        let charging = self
            .repos
            .charging_orders()
            .list_earning_for_driver(driver_id)
            .await?;

        let mut entries: Vec<EarningEntry> = Vec::with_capacity(fuel.len() + charging.len());
        for order in &fuel {
            // delivered_at is always set on DELIVERED orders; fall back
            // to updated_at for data imported before stamping existed
            let completed_at = order.delivered_at.unwrap_or(order.updated_at);
            entries.push(EarningEntry {
                order_id: order.id.clone(),
                order_number: order.order_number.clone(),
                kind: "fuel",
                delivery_fee: order.delivery_fee,
                tip: order.tip,
                amount: order.delivery_fee + order.tip,
                completed_at,
            });
        }
        for order in &charging {
            let completed_at = order.completed_at.unwrap_or(order.updated_at);
            entries.push(EarningEntry {
                order_id: order.id.clone(),
                order_number: order.order_number.clone(),
                kind: "charging",
                delivery_fee: order.delivery_fee,
                tip: order.tip,
                amount: order.delivery_fee + order.tip,
                completed_at,
            });
        }

        let total_earned: Decimal = entries.iter().map(|e| e.amount).sum();
        let total_paid_out = self.repos.payouts().total_paid_out(driver_id).await?;
        let available_balance = (total_earned - total_paid_out).max(Decimal::ZERO);

        entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        entries.truncate(RECENT_EARNINGS_LIMIT);

        Ok(EarningsSummary {
            driver_id: driver_id.to_string(),
            total_earned,
            total_paid_out,
            available_balance,
            can_withdraw: available_balance >= self.min_payout,
            recent: entries,
        })
    }

    /// Request a payout of `amount` against the available balance.
    ///
    /// Validation failures write no ledger row. Once validated, a
    /// PENDING row reserves the amount, the transfer runs against the
    /// payout rail, and the row is finalized exactly once with the
    /// outcome. A FAILED payout is returned to the caller (who surfaces
    /// a non-success response) with the failure reason recorded.
    pub async fn request_payout(
        &self,
        driver_id: &str,
        amount: Decimal,
    ) -> DomainResult<DriverPayout> {
        let driver = self
            .repos
            .drivers()
            .find_by_id(driver_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Driver",
                field: "id",
                value: driver_id.to_string(),
            })?;
        let destination = driver.payout_account_id.clone().ok_or_else(|| {
            DomainError::Validation("Driver has no payout destination configured".to_string())
        })?;

        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "Payout amount must be positive".to_string(),
            ));
        }
        if amount < self.min_payout {
            return Err(DomainError::Validation(format!(
                "Payout amount must be at least {}",
                self.min_payout
            )));
        }

        // Recompute at request time; the repository re-validates against
        // in-flight payouts inside the reservation transaction.
        let summary = self.compute_earnings(driver_id).await?;
        if amount > summary.available_balance {
            return Err(DomainError::InsufficientBalance {
                requested: amount,
                available: summary.available_balance,
            });
        }

        let now = Utc::now();
        let pending = DriverPayout {
            id: Uuid::new_v4().to_string(),
            driver_id: driver_id.to_string(),
            amount,
            status: PayoutStatus::Pending,
            external_transfer_id: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        };
        let reserved = self
            .repos
            .payouts()
            .reserve(pending, summary.total_earned)
            .await?;

        // Transfer after the reservation committed; the row is
        // finalized with whatever the rail answers.
        let (status, transfer_id, failure_reason) =
            match self.gateway.transfer(&destination, amount, &self.currency).await {
                Ok(TransferOutcome::Succeeded { transfer_id }) => {
                    (PayoutStatus::Succeeded, Some(transfer_id), None)
                }
                Ok(TransferOutcome::Failed { reason }) => {
                    warn!(driver_id, %amount, reason = %reason, "Payout transfer declined");
                    (PayoutStatus::Failed, None, Some(reason))
                }
                Err(e) => {
                    warn!(driver_id, %amount, error = %e, "Payout transfer errored");
                    (PayoutStatus::Failed, None, Some(e.to_string()))
                }
            };

        let payout = self
            .repos
            .payouts()
            .finalize(&reserved.id, status, transfer_id, failure_reason)
            .await?;

        metrics::counter!("payouts_total", "status" => status.as_str()).increment(1);
        info!(
            driver_id,
            payout_id = %payout.id,
            amount = %payout.amount,
            status = status.as_str(),
            "Payout finalized"
        );

        self.event_bus.publish(Event::PayoutFinalized {
            driver_id: driver_id.to_string(),
            payout_id: payout.id.clone(),
            amount: payout.amount,
            status,
        });

        Ok(payout)
    }

    pub async fn list_payouts(&self, driver_id: &str) -> DomainResult<Vec<DriverPayout>> {
        self.repos.payouts().list_for_driver(driver_id).await
    }
}
