//! Customer car DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::car::Car;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarDto {
    pub id: String,
    pub make: String,
    pub model: String,
    pub plate: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CarDto {
    pub fn from_domain(car: &Car) -> Self {
        Self {
            id: car.id.clone(),
            make: car.make.clone(),
            model: car.model.clone(),
            plate: car.plate.clone(),
            created_at: car.created_at,
        }
    }
}

/// Register a car
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 50))]
    pub make: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(length(max = 20))]
    pub plate: Option<String>,
}
