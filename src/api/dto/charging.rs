//! Charging order DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::charging_order::ChargingOrder;

/// Charging order as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChargingOrderDto {
    pub id: String,
    pub order_number: String,
    pub customer_id: String,
    pub address_id: String,
    pub driver_id: Option<String>,
    pub charging_unit_id: Option<String>,
    /// 1h, 2h, 5h or 24h
    pub charging_duration: String,
    pub number_of_cars: i32,
    pub car_ids: Vec<String>,
    pub base_fee: Decimal,
    pub distance: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    pub total_amount: Decimal,
    /// PENDING, CONFIRMED, ASSIGNED, IN_PROGRESS, COMPLETED, CANCELLED
    pub status: String,
    pub payment_method: String,
    pub payment_status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl ChargingOrderDto {
    pub fn from_domain(order: &ChargingOrder) -> Self {
        Self {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            address_id: order.address_id.clone(),
            driver_id: order.driver_id.clone(),
            charging_unit_id: order.charging_unit_id.clone(),
            charging_duration: order.charging_duration.as_str().to_string(),
            number_of_cars: order.number_of_cars,
            car_ids: order.car_ids.clone(),
            base_fee: order.base_fee,
            distance: order.distance,
            delivery_fee: order.delivery_fee,
            tax: order.tax,
            tip: order.tip,
            total_amount: order.total_amount,
            status: order.status.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            scheduled_at: order.scheduled_at,
            notes: order.notes.clone(),
            cancellation_reason: order.cancellation_reason.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            started_at: order.started_at,
            completed_at: order.completed_at,
            cancelled_at: order.cancelled_at,
        }
    }
}

/// Create a charging order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChargingOrderRequest {
    #[validate(length(min = 1))]
    pub address_id: String,
    /// 1h, 2h, 5h or 24h
    #[validate(length(min = 1))]
    pub charging_duration: String,
    pub number_of_cars: i32,
    /// Must list exactly `number_of_cars` customer-owned cars
    #[validate(length(min = 1))]
    pub car_ids: Vec<String>,
    /// ONLINE, CASH_ON_DELIVERY or CARD_ON_DELIVERY
    pub payment_method: String,
    pub tip: Option<Decimal>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}
