//! Dispatch coordination: driver registration, availability, atomic
//! assignment and live location updates.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::driver::{Driver, DriverLocation};
use crate::domain::pricing::Coordinates;
use crate::domain::{DomainError, DomainResult, OrderKind, RepositoryProvider};
use crate::notifications::{Event, SharedEventBus};

/// New driver registration (admin)
#[derive(Debug, Clone)]
pub struct RegisterDriver {
    pub name: String,
    pub phone: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
    pub payout_account_id: Option<String>,
}

pub struct DispatchService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
}

impl DispatchService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self { repos, event_bus }
    }

    pub async fn register_driver(&self, cmd: RegisterDriver) -> DomainResult<Driver> {
        let now = Utc::now();
        let driver = Driver {
            id: Uuid::new_v4().to_string(),
            name: cmd.name,
            phone: cmd.phone,
            vehicle_make: cmd.vehicle_make,
            vehicle_model: cmd.vehicle_model,
            vehicle_plate: cmd.vehicle_plate,
            is_available: false,
            is_active: true,
            payout_account_id: cmd.payout_account_id,
            created_at: now,
            updated_at: now,
        };
        let driver = self.repos.drivers().insert(driver).await?;
        info!(driver_id = %driver.id, "Driver registered");
        Ok(driver)
    }

    pub async fn get_driver(&self, driver_id: &str) -> DomainResult<Driver> {
        self.repos
            .drivers()
            .find_by_id(driver_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Driver",
                field: "id",
                value: driver_id.to_string(),
            })
    }

    pub async fn list_drivers(&self, page: u64, limit: u64) -> DomainResult<(Vec<Driver>, u64)> {
        self.repos.drivers().list(page, limit).await
    }

    pub async fn set_availability(&self, driver_id: &str, available: bool) -> DomainResult<()> {
        self.repos
            .drivers()
            .set_availability(driver_id, available)
            .await?;
        info!(driver_id, available, "Driver availability updated");
        Ok(())
    }

    /// Assign a driver to a fuel or charging order.
    ///
    /// The repository runs the availability check and the order write in
    /// one transaction, so two concurrent assignments cannot both pass
    /// the check. A PENDING order advances to CONFIRMED (fuel) or
    /// ASSIGNED (charging); any other status is left unchanged.
    pub async fn assign_driver(
        &self,
        kind: OrderKind,
        order_id: &str,
        driver_id: &str,
        charging_unit_id: Option<&str>,
    ) -> DomainResult<()> {
        match kind {
            OrderKind::Fuel => {
                let order = self
                    .repos
                    .orders()
                    .assign_driver(order_id, driver_id)
                    .await?;

                metrics::counter!("driver_assignments_total", "type" => "fuel").increment(1);
                info!(order_id, driver_id, "Driver assigned to fuel order");

                self.event_bus.publish(Event::DriverAssigned {
                    order_id: order.id.clone(),
                    order_number: order.order_number.clone(),
                    kind,
                    customer_id: order.customer_id.clone(),
                    driver_id: driver_id.to_string(),
                });
            }
            OrderKind::Charging => {
                let order = self
                    .repos
                    .charging_orders()
                    .assign_driver(order_id, driver_id, charging_unit_id)
                    .await?;

                metrics::counter!("driver_assignments_total", "type" => "charging").increment(1);
                info!(order_id, driver_id, "Driver assigned to charging order");

                self.event_bus.publish(Event::DriverAssigned {
                    order_id: order.id.clone(),
                    order_number: order.order_number.clone(),
                    kind,
                    customer_id: order.customer_id.clone(),
                    driver_id: driver_id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Latest-wins location ping; one row per driver, no history.
    pub async fn update_location(
        &self,
        driver_id: &str,
        position: Coordinates,
        accuracy: Option<f64>,
        heading: Option<f64>,
        speed: Option<f64>,
    ) -> DomainResult<()> {
        if !position.is_valid() {
            return Err(DomainError::Validation(format!(
                "Invalid coordinates ({}, {})",
                position.lat, position.lon
            )));
        }
        // Reject pings from unknown drivers
        self.get_driver(driver_id).await?;

        self.repos
            .drivers()
            .upsert_location(DriverLocation {
                driver_id: driver_id.to_string(),
                position,
                accuracy,
                heading,
                speed,
                updated_at: Utc::now(),
            })
            .await
    }

    pub async fn get_location(&self, driver_id: &str) -> DomainResult<Option<DriverLocation>> {
        self.repos.drivers().find_location(driver_id).await
    }
}
