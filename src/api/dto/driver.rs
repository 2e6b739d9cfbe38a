//! Driver and dispatch DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::driver::{Driver, DriverLocation};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DriverDto {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
    pub is_available: bool,
    pub is_active: bool,
    /// Whether a payout destination is configured
    pub has_payout_account: bool,
    pub created_at: DateTime<Utc>,
}

impl DriverDto {
    pub fn from_domain(driver: &Driver) -> Self {
        Self {
            id: driver.id.clone(),
            name: driver.name.clone(),
            phone: driver.phone.clone(),
            vehicle_make: driver.vehicle_make.clone(),
            vehicle_model: driver.vehicle_model.clone(),
            vehicle_plate: driver.vehicle_plate.clone(),
            is_available: driver.is_available,
            is_active: driver.is_active,
            has_payout_account: driver.payout_account_id.is_some(),
            created_at: driver.created_at,
        }
    }
}

/// Register a driver (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterDriverRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
    /// Connected account id at the payout rail
    pub payout_account_id: Option<String>,
}

/// Toggle driver availability
#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    pub available: bool,
}

/// Driver location ping
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LocationUpdateRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
    pub accuracy: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationDto {
    pub driver_id: String,
    pub lat: f64,
    pub lon: f64,
    pub accuracy: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl LocationDto {
    pub fn from_domain(location: &DriverLocation) -> Self {
        Self {
            driver_id: location.driver_id.clone(),
            lat: location.position.lat,
            lon: location.position.lon,
            accuracy: location.accuracy,
            heading: location.heading,
            speed: location.speed,
            updated_at: location.updated_at,
        }
    }
}

/// Assign a driver to an order (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignDriverRequest {
    #[validate(length(min = 1))]
    pub driver_id: String,
    /// Only meaningful for charging orders
    pub charging_unit_id: Option<String>,
}
