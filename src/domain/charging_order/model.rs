//! EV charging order domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::order::{PaymentMethod, PaymentStatus};
use crate::domain::{DomainError, DomainResult};

/// Minimum cars per charging order.
pub const MIN_CARS: i32 = 1;
/// Maximum cars per charging order.
pub const MAX_CARS: i32 = 10;

/// Order number prefix for charging orders.
pub const CHARGING_NUMBER_PREFIX: &str = "CHG";

/// Session duration tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingDuration {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "5h")]
    FiveHours,
    #[serde(rename = "24h")]
    TwentyFourHours,
}

impl ChargingDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::TwoHours => "2h",
            Self::FiveHours => "5h",
            Self::TwentyFourHours => "24h",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1h" => Some(Self::OneHour),
            "2h" => Some(Self::TwoHours),
            "5h" => Some(Self::FiveHours),
            "24h" => Some(Self::TwentyFourHours),
            _ => None,
        }
    }

    /// Fixed per-car price table.
    pub fn per_car_price(&self) -> Decimal {
        match self {
            Self::OneHour => dec!(25),
            Self::TwoHours => dec!(45),
            Self::FiveHours => dec!(100),
            Self::TwentyFourHours => dec!(350),
        }
    }
}

/// Charging order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargingStatus {
    Pending,
    Confirmed,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl ChargingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "ASSIGNED" => Some(Self::Assigned),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Shared transition validator; ASSIGNED may be reached straight
    /// from PENDING when dispatch happens without a prior confirmation.
    pub fn can_transition(&self, next: ChargingStatus) -> bool {
        use ChargingStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Pending, Assigned) => true,
            (Confirmed, Assigned) => true,
            (Assigned, InProgress) => true,
            (InProgress, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn customer_can_cancel(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for ChargingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// EV charging session order covering one or more customer cars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingOrder {
    pub id: String,
    pub customer_id: String,
    pub address_id: String,
    pub driver_id: Option<String>,
    pub charging_unit_id: Option<String>,
    /// Unique human-facing number, `CHG-{millis}-{rand6}`
    pub order_number: String,
    pub charging_duration: ChargingDuration,
    pub number_of_cars: i32,
    /// Cars covered by this session; each owned by the customer
    pub car_ids: Vec<String>,
    /// per-car price x number of cars
    pub base_fee: Decimal,
    pub distance: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    pub total_amount: Decimal,
    pub status: ChargingStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl ChargingOrder {
    pub fn apply_status(&mut self, next: ChargingStatus) -> DomainResult<()> {
        if !self.status.can_transition(next) {
            return Err(DomainError::IllegalTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        let now = Utc::now();
        match next {
            ChargingStatus::InProgress => {
                self.started_at = Some(now);
            }
            ChargingStatus::Completed => {
                self.completed_at = Some(now);
                if self.payment_status == PaymentStatus::Pending
                    && self.payment_method.settles_on_delivery()
                {
                    self.payment_status = PaymentStatus::Paid;
                }
            }
            ChargingStatus::Cancelled => {
                self.cancelled_at = Some(now);
            }
            _ => {}
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn customer_cancel(&mut self, reason: Option<String>) -> DomainResult<()> {
        if !self.status.customer_can_cancel() {
            return Err(DomainError::IllegalCancellation {
                status: self.status.to_string(),
            });
        }
        self.cancellation_reason = reason;
        self.apply_status(ChargingStatus::Cancelled)
    }

    pub fn accrues_earnings(&self) -> bool {
        self.status == ChargingStatus::Completed && self.payment_status == PaymentStatus::Paid
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ChargingStatus, method: PaymentMethod) -> ChargingOrder {
        ChargingOrder {
            id: "chg-1".into(),
            customer_id: "cust-1".into(),
            address_id: "addr-1".into(),
            driver_id: None,
            charging_unit_id: None,
            order_number: "CHG-1724700000000-123456".into(),
            charging_duration: ChargingDuration::TwoHours,
            number_of_cars: 2,
            car_ids: vec!["car-1".into(), "car-2".into()],
            base_fee: dec!(90),
            distance: dec!(2),
            delivery_fee: dec!(2.50),
            tax: dec!(5.55),
            tip: dec!(0),
            total_amount: dec!(98.05),
            status,
            payment_method: method,
            payment_status: PaymentStatus::Pending,
            scheduled_at: None,
            notes: None,
            cancellation_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            started_at: None,
            completed_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn per_car_price_table() {
        assert_eq!(ChargingDuration::OneHour.per_car_price(), dec!(25));
        assert_eq!(ChargingDuration::TwoHours.per_car_price(), dec!(45));
        assert_eq!(ChargingDuration::FiveHours.per_car_price(), dec!(100));
        assert_eq!(ChargingDuration::TwentyFourHours.per_car_price(), dec!(350));
    }

    #[test]
    fn transition_graph() {
        use ChargingStatus::*;
        assert!(Pending.can_transition(Confirmed));
        assert!(Pending.can_transition(Assigned));
        assert!(Confirmed.can_transition(Assigned));
        assert!(Assigned.can_transition(InProgress));
        assert!(InProgress.can_transition(Completed));
        assert!(InProgress.can_transition(Cancelled));

        assert!(!Pending.can_transition(InProgress));
        assert!(!Completed.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Pending));
    }

    #[test]
    fn starting_stamps_started_at() {
        let mut order = sample(ChargingStatus::Assigned, PaymentMethod::Online);
        order.apply_status(ChargingStatus::InProgress).unwrap();
        assert!(order.started_at.is_some());
        assert!(order.completed_at.is_none());
    }

    #[test]
    fn completion_settles_on_delivery_payment() {
        let mut order = sample(ChargingStatus::InProgress, PaymentMethod::CardOnDelivery);
        order.apply_status(ChargingStatus::Completed).unwrap();
        assert!(order.completed_at.is_some());
        assert_eq!(order.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn customer_may_cancel_in_progress_but_not_completed() {
        let mut in_progress = sample(ChargingStatus::InProgress, PaymentMethod::Online);
        assert!(in_progress.customer_cancel(None).is_ok());

        let mut completed = sample(ChargingStatus::Completed, PaymentMethod::Online);
        let err = completed.customer_cancel(None).unwrap_err();
        assert!(matches!(err, DomainError::IllegalCancellation { .. }));
    }
}
