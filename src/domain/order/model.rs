//! Fuel delivery order domain entity

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Minimum liters per order item.
pub const MIN_QUANTITY_LITERS: i32 = 50;
/// Maximum liters per order item.
pub const MAX_QUANTITY_LITERS: i32 = 5000;

/// Order number prefix for fuel orders.
pub const ORDER_NUMBER_PREFIX: &str = "PT";

/// Fuel order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Dispatched,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Dispatched => "DISPATCHED",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "DISPATCHED" => Some(Self::Dispatched),
            "IN_TRANSIT" => Some(Self::InTransit),
            "DELIVERED" => Some(Self::Delivered),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Single transition validator used by every caller, administrative
    /// endpoints included.
    pub fn can_transition(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, Dispatched) => true,
            (Dispatched, InTransit) => true,
            (InTransit, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Customers may only cancel before the driver is on the road.
    pub fn customer_can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Online,
    CashOnDelivery,
    CardOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::CashOnDelivery => "CASH_ON_DELIVERY",
            Self::CardOnDelivery => "CARD_ON_DELIVERY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ONLINE" => Some(Self::Online),
            "CASH_ON_DELIVERY" => Some(Self::CashOnDelivery),
            "CARD_ON_DELIVERY" => Some(Self::CardOnDelivery),
            _ => None,
        }
    }

    /// On-delivery methods settle at hand-off rather than via the gateway.
    pub fn settles_on_delivery(&self) -> bool {
        !matches!(self, Self::Online)
    }
}

/// Recorded payment state (what we know about the processor, not its ledger)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "PAID" => Some(Self::Paid),
            "FAILED" => Some(Self::Failed),
            "REFUNDED" => Some(Self::Refunded),
            _ => None,
        }
    }
}

/// Private household vs. commercial delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    Private,
    Commercial,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Commercial => "COMMERCIAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PRIVATE" => Some(Self::Private),
            "COMMERCIAL" => Some(Self::Commercial),
            _ => None,
        }
    }
}

/// A single fuel line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    /// Quantity in liters
    pub quantity: i32,
    /// Customer-facing price per liter (base price with markup applied)
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Fuel delivery order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub address_id: String,
    pub driver_id: Option<String>,
    /// Unique human-facing number, `PT-{millis}-{rand6}`.
    /// Uniqueness is enforced by the store, not by construction.
    pub order_number: String,
    pub delivery_type: DeliveryType,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// Sum of item subtotals (markup included)
    pub fuel_cost: Decimal,
    /// Internal-only markup amount, never exposed to the customer
    pub company_markup: Decimal,
    /// Distance from the company origin to the address, miles
    pub distance: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    /// fuel_cost + delivery_fee + tax + tip, components rounded independently
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Apply a validated status transition, stamping timestamps and
    /// settling on-delivery payment where the transition requires it.
    pub fn apply_status(&mut self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition(next) {
            return Err(DomainError::IllegalTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        let now = Utc::now();
        match next {
            OrderStatus::Delivered => {
                self.delivered_at = Some(now);
                if self.payment_status == PaymentStatus::Pending
                    && self.payment_method.settles_on_delivery()
                {
                    self.payment_status = PaymentStatus::Paid;
                }
            }
            OrderStatus::Cancelled => {
                self.cancelled_at = Some(now);
            }
            _ => {}
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Customer-initiated cancellation; stricter than the transition
    /// graph alone.
    pub fn customer_cancel(&mut self, reason: Option<String>) -> DomainResult<()> {
        if !self.status.customer_can_cancel() {
            return Err(DomainError::IllegalCancellation {
                status: self.status.to_string(),
            });
        }
        self.cancellation_reason = reason;
        self.apply_status(OrderStatus::Cancelled)
    }

    /// Earnings accrue to the driver once the order is delivered and paid.
    pub fn accrues_earnings(&self) -> bool {
        self.status == OrderStatus::Delivered && self.payment_status == PaymentStatus::Paid
    }
}

/// Generate an order number: `{prefix}-{unix millis}-{6 random digits}`.
///
/// Collisions are theoretically possible; the store's uniqueness
/// constraint catches them and creation retries with a fresh number.
pub fn generate_order_number(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}-{}-{:06}", prefix, millis, suffix)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order(status: OrderStatus, method: PaymentMethod) -> Order {
        Order {
            id: "ord-1".into(),
            customer_id: "cust-1".into(),
            address_id: "addr-1".into(),
            driver_id: None,
            order_number: generate_order_number(ORDER_NUMBER_PREFIX),
            delivery_type: DeliveryType::Private,
            status,
            payment_method: method,
            payment_status: PaymentStatus::Pending,
            fuel_cost: dec!(175.17),
            company_markup: dec!(0.17),
            distance: dec!(4.2),
            delivery_fee: dec!(4.89),
            tax: dec!(10.80),
            tip: dec!(5),
            total_amount: dec!(195.86),
            items: vec![],
            delivery_date: None,
            cancellation_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            delivered_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn transition_graph_is_linear_with_cancel() {
        use OrderStatus::*;
        assert!(Pending.can_transition(Confirmed));
        assert!(Confirmed.can_transition(Dispatched));
        assert!(Dispatched.can_transition(InTransit));
        assert!(InTransit.can_transition(Delivered));
        assert!(Pending.can_transition(Cancelled));
        assert!(InTransit.can_transition(Cancelled));

        assert!(!Pending.can_transition(Dispatched));
        assert!(!Confirmed.can_transition(Delivered));
        assert!(!Delivered.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Pending));
    }

    #[test]
    fn customer_cannot_cancel_once_dispatched() {
        let mut order = sample_order(OrderStatus::Dispatched, PaymentMethod::Online);
        let err = order.customer_cancel(None).unwrap_err();
        assert!(matches!(err, DomainError::IllegalCancellation { .. }));
        assert_eq!(order.status, OrderStatus::Dispatched);
    }

    #[test]
    fn customer_can_cancel_pending_order() {
        let mut order = sample_order(OrderStatus::Pending, PaymentMethod::Online);
        order.customer_cancel(Some("changed my mind".into())).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.cancelled_at.is_some());
        assert_eq!(order.cancellation_reason.as_deref(), Some("changed my mind"));
    }

    #[test]
    fn delivery_settles_cash_on_delivery() {
        let mut order = sample_order(OrderStatus::InTransit, PaymentMethod::CashOnDelivery);
        order.apply_status(OrderStatus::Delivered).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn delivery_leaves_online_payment_pending() {
        // Online payment is confirmed by the gateway callback, not hand-off
        let mut order = sample_order(OrderStatus::InTransit, PaymentMethod::Online);
        order.apply_status(OrderStatus::Delivered).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn delivery_does_not_overwrite_paid_status() {
        let mut order = sample_order(OrderStatus::InTransit, PaymentMethod::CardOnDelivery);
        order.payment_status = PaymentStatus::Paid;
        order.apply_status(OrderStatus::Delivered).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn order_number_format() {
        let n = generate_order_number(ORDER_NUMBER_PREFIX);
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PT");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn total_is_sum_of_rounded_components() {
        let order = sample_order(OrderStatus::Pending, PaymentMethod::Online);
        assert_eq!(
            order.total_amount,
            order.fuel_cost + order.delivery_fee + order.tax + order.tip
        );
    }
}
