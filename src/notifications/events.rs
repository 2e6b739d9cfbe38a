//! Event types published on the bus after a state commit

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ChargingStatus, OrderKind, OrderStatus, PaymentStatus, PayoutStatus};

/// Domain event emitted after the corresponding state change committed.
/// Consumers must tolerate loss; the bus is best-effort by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    OrderStatusChanged {
        order_id: String,
        order_number: String,
        customer_id: String,
        driver_id: Option<String>,
        status: OrderStatus,
    },
    ChargingStatusChanged {
        order_id: String,
        order_number: String,
        customer_id: String,
        driver_id: Option<String>,
        status: ChargingStatus,
    },
    DriverAssigned {
        order_id: String,
        order_number: String,
        kind: OrderKind,
        customer_id: String,
        driver_id: String,
    },
    PaymentStatusChanged {
        order_id: String,
        order_number: String,
        kind: OrderKind,
        customer_id: String,
        payment_status: PaymentStatus,
    },
    PayoutFinalized {
        driver_id: String,
        payout_id: String,
        amount: Decimal,
        status: PayoutStatus,
    },
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::OrderStatusChanged { .. } => "order_status_changed",
            Self::ChargingStatusChanged { .. } => "charging_status_changed",
            Self::DriverAssigned { .. } => "driver_assigned",
            Self::PaymentStatusChanged { .. } => "payment_status_changed",
            Self::PayoutFinalized { .. } => "payout_finalized",
        }
    }
}

/// Event with envelope metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub event: Event,
    pub timestamp: DateTime<Utc>,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}
