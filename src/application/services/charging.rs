//! Charging order business logic: session creation with per-duration
//! pricing, status transitions, customer cancellation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{Actor, PricingContext};
use crate::domain::charging_order::{
    ChargingDuration, ChargingOrder, ChargingStatus, CHARGING_NUMBER_PREFIX, MAX_CARS, MIN_CARS,
};
use crate::domain::order::{generate_order_number, PaymentMethod, PaymentStatus};
use crate::domain::pricing::distance_miles;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::{Event, SharedEventBus};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Create-charging-order command
#[derive(Debug, Clone)]
pub struct CreateChargingOrder {
    pub customer_id: String,
    pub address_id: String,
    pub charging_duration: ChargingDuration,
    pub number_of_cars: i32,
    pub car_ids: Vec<String>,
    pub payment_method: PaymentMethod,
    pub tip: Option<Decimal>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub struct ChargingService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
    pricing: PricingContext,
}

impl ChargingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        event_bus: SharedEventBus,
        pricing: PricingContext,
    ) -> Self {
        Self {
            repos,
            event_bus,
            pricing,
        }
    }

    /// Create a charging order covering `number_of_cars` customer cars.
    pub async fn create(&self, cmd: CreateChargingOrder) -> DomainResult<ChargingOrder> {
        let address = self
            .repos
            .addresses()
            .find_by_id(&cmd.address_id)
            .await?
            .filter(|a| a.customer_id == cmd.customer_id)
            .ok_or(DomainError::NotFound {
                entity: "Address",
                field: "id",
                value: cmd.address_id.clone(),
            })?;
        let destination = address
            .coordinates
            .ok_or_else(|| DomainError::AddressNotGeocoded(address.id.clone()))?;

        if !(MIN_CARS..=MAX_CARS).contains(&cmd.number_of_cars) {
            return Err(DomainError::Validation(format!(
                "Number of cars must be between {} and {}",
                MIN_CARS, MAX_CARS
            )));
        }
        if cmd.car_ids.len() != cmd.number_of_cars as usize {
            return Err(DomainError::Validation(format!(
                "Expected {} car ids, got {}",
                cmd.number_of_cars,
                cmd.car_ids.len()
            )));
        }
        for car_id in &cmd.car_ids {
            self.repos
                .cars()
                .find_by_id(car_id)
                .await?
                .filter(|c| c.customer_id == cmd.customer_id)
                .ok_or(DomainError::NotFound {
                    entity: "Car",
                    field: "id",
                    value: car_id.clone(),
                })?;
        }
        let tip = cmd.tip.unwrap_or(Decimal::ZERO);
        if tip < Decimal::ZERO {
            return Err(DomainError::Validation("Tip cannot be negative".to_string()));
        }

        let base_fee = cmd.charging_duration.per_car_price() * Decimal::from(cmd.number_of_cars);
        let distance = distance_miles(self.pricing.origin, destination);
        let delivery_fee = self.pricing.config.delivery_fee(distance);
        let tax = self
            .pricing
            .config
            .tax(base_fee + delivery_fee, self.pricing.state_code.as_deref());
        let total_amount = base_fee + delivery_fee + tax + tip;

        let now = Utc::now();
        let order = ChargingOrder {
            id: Uuid::new_v4().to_string(),
            customer_id: cmd.customer_id,
            address_id: cmd.address_id,
            driver_id: None,
            charging_unit_id: None,
            order_number: generate_order_number(CHARGING_NUMBER_PREFIX),
            charging_duration: cmd.charging_duration,
            number_of_cars: cmd.number_of_cars,
            car_ids: cmd.car_ids,
            base_fee,
            distance,
            delivery_fee,
            tax,
            tip,
            total_amount,
            status: ChargingStatus::Pending,
            payment_method: cmd.payment_method,
            payment_status: PaymentStatus::Pending,
            scheduled_at: cmd.scheduled_at,
            notes: cmd.notes,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
        };

        let mut first_attempt = true;
        let saved = retry_with_backoff(
            RetryConfig::single_retry(),
            || {
                let mut order = order.clone();
                if !first_attempt {
                    order.order_number = generate_order_number(CHARGING_NUMBER_PREFIX);
                }
                first_attempt = false;
                self.repos.charging_orders().insert(order)
            },
            DomainError::is_transient,
            "insert_charging_order",
        )
        .await?;

        metrics::counter!("orders_created_total", "type" => "charging").increment(1);
        info!(
            order_id = %saved.id,
            order_number = %saved.order_number,
            cars = saved.number_of_cars,
            total = %saved.total_amount,
            "Charging order created"
        );

        self.event_bus.publish(Event::ChargingStatusChanged {
            order_id: saved.id.clone(),
            order_number: saved.order_number.clone(),
            customer_id: saved.customer_id.clone(),
            driver_id: None,
            status: saved.status,
        });

        Ok(saved)
    }

    pub async fn get(&self, order_id: &str, actor: &Actor) -> DomainResult<ChargingOrder> {
        let order = self.find(order_id).await?;
        let allowed = match actor {
            Actor::Admin => true,
            Actor::Customer(id) => order.customer_id == *id,
            Actor::Driver(id) => order.driver_id.as_deref() == Some(id.as_str()),
        };
        if !allowed {
            return Err(DomainError::NotFound {
                entity: "ChargingOrder",
                field: "id",
                value: order_id.to_string(),
            });
        }
        Ok(order)
    }

    pub async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)> {
        self.repos
            .charging_orders()
            .list_for_customer(customer_id, page, limit)
            .await
    }

    pub async fn list_all(
        &self,
        status: Option<ChargingStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)> {
        self.repos
            .charging_orders()
            .list_all(status, page, limit)
            .await
    }

    /// Advance the status under the shared transition graph.
    pub async fn set_status(
        &self,
        order_id: &str,
        next: ChargingStatus,
        actor: &Actor,
    ) -> DomainResult<ChargingOrder> {
        let mut order = self.find(order_id).await?;

        match actor {
            Actor::Admin => {}
            Actor::Driver(driver_id) => {
                if order.driver_id.as_deref() != Some(driver_id.as_str()) {
                    return Err(DomainError::Forbidden(
                        "Order is not assigned to this driver".to_string(),
                    ));
                }
                if !matches!(next, ChargingStatus::InProgress | ChargingStatus::Completed) {
                    return Err(DomainError::Forbidden(format!(
                        "Drivers cannot set status {}",
                        next
                    )));
                }
            }
            Actor::Customer(_) => {
                return Err(DomainError::Forbidden(
                    "Customers cancel through the cancellation endpoint".to_string(),
                ));
            }
        }

        let expected = order.status;
        order.apply_status(next)?;
        self.repos
            .charging_orders()
            .update_transition(&order, expected)
            .await?;

        metrics::counter!("order_status_transitions_total", "type" => "charging", "status" => next.as_str())
            .increment(1);
        info!(order_id = %order.id, status = %order.status, "Charging order status updated");

        self.event_bus.publish(Event::ChargingStatusChanged {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            driver_id: order.driver_id.clone(),
            status: order.status,
        });

        Ok(order)
    }

    pub async fn customer_cancel(
        &self,
        order_id: &str,
        customer_id: &str,
        reason: Option<String>,
    ) -> DomainResult<ChargingOrder> {
        let mut order = self.find(order_id).await?;
        if order.customer_id != customer_id {
            return Err(DomainError::NotFound {
                entity: "ChargingOrder",
                field: "id",
                value: order_id.to_string(),
            });
        }

        let expected = order.status;
        order.customer_cancel(reason)?;
        self.repos
            .charging_orders()
            .update_transition(&order, expected)
            .await?;

        info!(order_id = %order.id, "Charging order cancelled by customer");
        self.event_bus.publish(Event::ChargingStatusChanged {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            driver_id: order.driver_id.clone(),
            status: order.status,
        });

        Ok(order)
    }

    async fn find(&self, order_id: &str) -> DomainResult<ChargingOrder> {
        self.repos
            .charging_orders()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "ChargingOrder",
                field: "id",
                value: order_id.to_string(),
            })
    }
}
