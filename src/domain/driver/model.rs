//! Driver domain entity and live location

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pricing::Coordinates;

/// Delivery driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
    /// Driver-toggled; gates dispatch
    pub is_available: bool,
    /// Admin-toggled; inactive drivers can never be dispatched
    pub is_active: bool,
    /// Connected payout account at the payment rail; required before
    /// any payout request
    pub payout_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn can_be_dispatched(&self) -> bool {
        self.is_available && self.is_active
    }
}

/// Latest known driver position. One row per driver, overwritten on
/// each ping; no history retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverLocation {
    pub driver_id: String,
    pub position: Coordinates,
    pub accuracy: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    pub updated_at: DateTime<Utc>,
}
