//! Payment-status synchronization from gateway callbacks, manual
//! confirmation and refunds.
//!
//! We only record the status we know about the processor; its own
//! ledger is out of scope. All writes assign a terminal status, so
//! re-applying the same callback is a no-op in effect.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::order::PaymentStatus;
use crate::domain::{
    ChargeIntent, DomainError, DomainResult, OrderKind, PaymentGateway, PaymentOutcome,
    RepositoryProvider,
};
use crate::notifications::{Event, SharedEventBus};

/// Processor callback or manual confirmation payload. The claimed
/// outcome is advisory; the processor is asked for the real one.
#[derive(Debug, Clone)]
pub struct PaymentCallback {
    pub external_payment_id: String,
    pub claimed_outcome: PaymentOutcome,
    pub order_id: String,
    pub order_kind: OrderKind,
}

pub struct PaymentSyncService {
    repos: Arc<dyn RepositoryProvider>,
    gateway: Arc<dyn PaymentGateway>,
    event_bus: SharedEventBus,
    currency: String,
}

impl PaymentSyncService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<dyn PaymentGateway>,
        event_bus: SharedEventBus,
        currency: String,
    ) -> Self {
        Self {
            repos,
            gateway,
            event_bus,
            currency,
        }
    }

    /// Create a charge intent at the gateway for an ONLINE order.
    /// The order stays PENDING until the callback lands.
    pub async fn create_intent(
        &self,
        order_id: &str,
        kind: OrderKind,
    ) -> DomainResult<ChargeIntent> {
        let (total, method_is_online) = match kind {
            OrderKind::Fuel => {
                let order = self.find_fuel(order_id).await?;
                (order.total_amount, !order.payment_method.settles_on_delivery())
            }
            OrderKind::Charging => {
                let order = self.find_charging(order_id).await?;
                (order.total_amount, !order.payment_method.settles_on_delivery())
            }
        };
        if !method_is_online {
            return Err(DomainError::Validation(
                "Order is not paid online".to_string(),
            ));
        }

        self.gateway
            .create_charge_intent(total, &self.currency, order_id, kind)
            .await
    }

    /// Apply a processor outcome to the order it references. The
    /// payment is re-read from the gateway so a forged callback cannot
    /// mark an order paid. Idempotent: the terminal status is assigned,
    /// never accumulated, and earnings are derived from order state
    /// rather than callback counts.
    pub async fn apply(&self, callback: PaymentCallback) -> DomainResult<PaymentStatus> {
        let outcome = self
            .gateway
            .retrieve_outcome(&callback.external_payment_id)
            .await?;
        if outcome != callback.claimed_outcome {
            warn!(
                payment_id = %callback.external_payment_id,
                claimed = ?callback.claimed_outcome,
                actual = ?outcome,
                "Callback outcome disagrees with the processor"
            );
        }
        let status = match outcome {
            PaymentOutcome::Succeeded => PaymentStatus::Paid,
            PaymentOutcome::Failed => PaymentStatus::Failed,
        };

        let (order_number, customer_id) = match callback.order_kind {
            OrderKind::Fuel => {
                let order = self.find_fuel(&callback.order_id).await?;
                self.repos
                    .orders()
                    .set_payment_status(&order.id, status)
                    .await?;
                (order.order_number, order.customer_id)
            }
            OrderKind::Charging => {
                let order = self.find_charging(&callback.order_id).await?;
                self.repos
                    .charging_orders()
                    .set_payment_status(&order.id, status)
                    .await?;
                (order.order_number, order.customer_id)
            }
        };

        metrics::counter!(
            "payment_status_updates_total",
            "outcome" => status.as_str()
        )
        .increment(1);
        info!(
            order_id = %callback.order_id,
            payment_id = %callback.external_payment_id,
            status = status.as_str(),
            "Payment status synchronized"
        );

        self.event_bus.publish(Event::PaymentStatusChanged {
            order_id: callback.order_id,
            order_number,
            kind: callback.order_kind,
            customer_id,
            payment_status: status,
        });

        Ok(status)
    }

    /// Issue a refund at the gateway. The order flips to REFUNDED only
    /// once the cumulative refunded amount covers the full total;
    /// partial refunds leave it PAID.
    pub async fn refund(
        &self,
        order_id: &str,
        kind: OrderKind,
        external_payment_id: &str,
        amount: Decimal,
    ) -> DomainResult<PaymentStatus> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "Refund amount must be positive".to_string(),
            ));
        }

        let refunded_total = self.gateway.refund(external_payment_id, amount).await?;

        let (status, order_number, customer_id) = match kind {
            OrderKind::Fuel => {
                let mut order = self.find_fuel(order_id).await?;
                if refunded_total >= order.total_amount {
                    order.payment_status = PaymentStatus::Refunded;
                    self.repos
                        .orders()
                        .set_payment_status(&order.id, order.payment_status)
                        .await?;
                }
                (order.payment_status, order.order_number, order.customer_id)
            }
            OrderKind::Charging => {
                let mut order = self.find_charging(order_id).await?;
                if refunded_total >= order.total_amount {
                    order.payment_status = PaymentStatus::Refunded;
                    self.repos
                        .charging_orders()
                        .set_payment_status(&order.id, order.payment_status)
                        .await?;
                }
                (order.payment_status, order.order_number, order.customer_id)
            }
        };

        info!(
            order_id,
            refunded = %refunded_total,
            status = status.as_str(),
            "Refund processed"
        );

        if status == PaymentStatus::Refunded {
            self.event_bus.publish(Event::PaymentStatusChanged {
                order_id: order_id.to_string(),
                order_number,
                kind,
                customer_id,
                payment_status: status,
            });
        }

        Ok(status)
    }

    async fn find_fuel(&self, order_id: &str) -> DomainResult<crate::domain::Order> {
        self.repos
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Order",
                field: "id",
                value: order_id.to_string(),
            })
    }

    async fn find_charging(&self, order_id: &str) -> DomainResult<crate::domain::ChargingOrder> {
        self.repos
            .charging_orders()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "ChargingOrder",
                field: "id",
                value: order_id.to_string(),
            })
    }
}
