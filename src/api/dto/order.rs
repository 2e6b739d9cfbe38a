//! Fuel order DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::order::{Order, OrderItem};

/// One fuel line item on an order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemDto {
    pub product_id: String,
    /// Liters
    pub quantity: i32,
    /// Price per liter
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl OrderItemDto {
    pub fn from_domain(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
        }
    }
}

/// Fuel order as returned by the API.
///
/// The internal markup amount is deliberately absent: customers see the
/// marked-up unit price only.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDto {
    pub id: String,
    pub order_number: String,
    pub customer_id: String,
    pub address_id: String,
    pub driver_id: Option<String>,
    /// PRIVATE or COMMERCIAL
    pub delivery_type: String,
    /// PENDING, CONFIRMED, DISPATCHED, IN_TRANSIT, DELIVERED, CANCELLED
    pub status: String,
    /// ONLINE, CASH_ON_DELIVERY, CARD_ON_DELIVERY
    pub payment_method: String,
    /// PENDING, PAID, FAILED, REFUNDED
    pub payment_status: String,
    pub fuel_cost: Decimal,
    /// Miles from the depot
    pub distance: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    pub total_amount: Decimal,
    pub items: Vec<OrderItemDto>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl OrderDto {
    pub fn from_domain(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            address_id: order.address_id.clone(),
            driver_id: order.driver_id.clone(),
            delivery_type: order.delivery_type.as_str().to_string(),
            status: order.status.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            fuel_cost: order.fuel_cost,
            distance: order.distance,
            delivery_fee: order.delivery_fee,
            tax: order.tax,
            tip: order.tip,
            total_amount: order.total_amount,
            items: order.items.iter().map(OrderItemDto::from_domain).collect(),
            delivery_date: order.delivery_date,
            cancellation_reason: order.cancellation_reason.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            delivered_at: order.delivered_at,
            cancelled_at: order.cancelled_at,
        }
    }
}

/// Requested line item
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    #[validate(length(min = 1))]
    pub product_id: String,
    /// Liters (bounds enforced by the order service)
    pub quantity: i32,
}

/// Create a fuel order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub address_id: String,
    /// PRIVATE or COMMERCIAL
    pub delivery_type: String,
    /// ONLINE, CASH_ON_DELIVERY or CARD_ON_DELIVERY
    pub payment_method: String,
    #[validate(length(min = 1, message = "at least one item is required"))]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
    pub tip: Option<Decimal>,
    pub delivery_date: Option<DateTime<Utc>>,
}

/// Set the order status (admin or assigned driver)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// Target status name
    #[validate(length(min = 1))]
    pub status: String,
}

/// Customer cancellation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelOrderRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Status filter for admin listings
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StatusFilter {
    pub status: Option<String>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_items() {
        let req = CreateOrderRequest {
            address_id: "addr-1".to_string(),
            delivery_type: "PRIVATE".to_string(),
            payment_method: "ONLINE".to_string(),
            items: vec![],
            tip: None,
            delivery_date: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_validates_nested_items() {
        let req = CreateOrderRequest {
            address_id: "addr-1".to_string(),
            delivery_type: "PRIVATE".to_string(),
            payment_method: "ONLINE".to_string(),
            items: vec![OrderItemRequest {
                product_id: String::new(),
                quantity: 100,
            }],
            tip: None,
            delivery_date: None,
        };
        assert!(req.validate().is_err());
    }
}
