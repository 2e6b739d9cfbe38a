//! Payment DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::ChargeIntent;

/// Create a charge intent for an ONLINE order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIntentRequest {
    #[validate(length(min = 1))]
    pub order_id: String,
    /// fuel or charging
    #[validate(length(min = 1))]
    pub order_kind: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChargeIntentDto {
    pub id: String,
    /// Confirmation secret, passed through to the client app
    pub client_secret: Option<String>,
    pub amount: Decimal,
    pub currency: String,
}

impl ChargeIntentDto {
    pub fn from_domain(intent: &ChargeIntent) -> Self {
        Self {
            id: intent.id.clone(),
            client_secret: intent.client_secret.clone(),
            amount: intent.amount,
            currency: intent.currency.clone(),
        }
    }
}

/// Processor callback payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PaymentCallbackRequest {
    #[validate(length(min = 1))]
    pub payment_id: String,
    /// succeeded or failed
    #[validate(length(min = 1))]
    pub status: String,
    #[validate(length(min = 1))]
    pub order_id: String,
    /// fuel or charging
    #[validate(length(min = 1))]
    pub order_kind: String,
}

/// Refund an online payment (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefundRequest {
    #[validate(length(min = 1))]
    pub order_id: String,
    /// fuel or charging
    #[validate(length(min = 1))]
    pub order_kind: String,
    #[validate(length(min = 1))]
    pub payment_id: String,
    pub amount: Decimal,
}

/// Result of applying a callback or a refund
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatusDto {
    /// PENDING, PAID, FAILED, REFUNDED
    pub payment_status: String,
}
