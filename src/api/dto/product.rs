//! Fuel product DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::pricing::PricingConfig;
use crate::domain::product::Product;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Customer-facing per-liter price (markup applied)
    pub unit_price: Decimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductDto {
    /// The base price never leaves the service; customers see the
    /// marked-up unit price.
    pub fn from_domain(product: &Product, pricing: &PricingConfig) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            unit_price: pricing.unit_price(product.base_price),
            is_available: product.is_available,
            created_at: product.created_at,
        }
    }
}

/// Create a product (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Per-liter base price, before markup
    pub base_price: Decimal,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Update a product (admin); absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub is_available: Option<bool>,
}
