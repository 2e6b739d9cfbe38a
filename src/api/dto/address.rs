//! Address DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::address::Address;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    pub id: String,
    pub label: String,
    pub street: String,
    pub city: String,
    pub state_code: Option<String>,
    pub postal_code: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Ungeocoded addresses cannot take orders
    pub is_geocoded: bool,
    pub created_at: DateTime<Utc>,
}

impl AddressDto {
    pub fn from_domain(address: &Address) -> Self {
        Self {
            id: address.id.clone(),
            label: address.label.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state_code: address.state_code.clone(),
            postal_code: address.postal_code.clone(),
            lat: address.coordinates.map(|c| c.lat),
            lon: address.coordinates.map(|c| c.lon),
            is_geocoded: address.is_geocoded(),
            created_at: address.created_at,
        }
    }
}

/// Create an address; coordinates are resolved by the geocoder
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAddressRequest {
    #[validate(length(min = 1, max = 100))]
    pub label: String,
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(max = 10))]
    pub state_code: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
}
