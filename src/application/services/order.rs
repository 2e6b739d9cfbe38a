//! Fuel order business logic: creation with pricing, status transitions,
//! customer cancellation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{Actor, PricingContext};
use crate::domain::order::{
    generate_order_number, DeliveryType, Order, OrderItem, OrderStatus, PaymentMethod,
    PaymentStatus, MAX_QUANTITY_LITERS, MIN_QUANTITY_LITERS, ORDER_NUMBER_PREFIX,
};
use crate::domain::pricing::{distance_miles, round2};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::{Event, SharedEventBus};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// A requested line item before validation and pricing
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    /// Liters
    pub quantity: i32,
}

/// Create-order command
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: String,
    pub address_id: String,
    pub delivery_type: DeliveryType,
    pub payment_method: PaymentMethod,
    pub items: Vec<NewOrderItem>,
    pub tip: Option<Decimal>,
    pub delivery_date: Option<DateTime<Utc>>,
}

pub struct OrderService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
    pricing: PricingContext,
}

impl OrderService {
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

    /// Create a fuel order. Validates the address and every item, runs
    /// the pricing pipeline and persists atomically. No driver is
    /// assigned and no payment is taken here; even ONLINE orders start
    /// with paymentStatus=PENDING.
    pub async fn create(&self, cmd: CreateOrder) -> DomainResult<Order> {
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

        if cmd.items.is_empty() {
            return Err(DomainError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }
        let tip = cmd.tip.unwrap_or(Decimal::ZERO);
        if tip < Decimal::ZERO {
            return Err(DomainError::Validation("Tip cannot be negative".to_string()));
        }

        // Price every item off the live catalog
        let mut items = Vec::with_capacity(cmd.items.len());
        let mut base_cost = Decimal::ZERO;
        let mut fuel_cost = Decimal::ZERO;
        for item in &cmd.items {
            if !(MIN_QUANTITY_LITERS..=MAX_QUANTITY_LITERS).contains(&item.quantity) {
                return Err(DomainError::InvalidQuantity {
                    quantity: item.quantity,
                    min: MIN_QUANTITY_LITERS,
                    max: MAX_QUANTITY_LITERS,
                });
            }
            let product = self
                .repos
                .products()
                .find_by_id(&item.product_id)
                .await?
                .ok_or(DomainError::NotFound {
                    entity: "Product",
                    field: "id",
                    value: item.product_id.clone(),
                })?;
            if !product.is_available {
                return Err(DomainError::Validation(format!(
                    "Product {} is not available",
                    product.name
                )));
            }

            let unit_price = self.pricing.config.unit_price(product.base_price);
            let subtotal = round2(Decimal::from(item.quantity) * unit_price);
            base_cost += Decimal::from(item.quantity) * product.base_price;
            fuel_cost += subtotal;
            items.push(OrderItem {
                product_id: product.id,
                quantity: item.quantity,
                unit_price,
                subtotal,
            });
        }

        let distance = distance_miles(self.pricing.origin, destination);
        let delivery_fee = self.pricing.config.delivery_fee(distance);
        let tax = self
            .pricing
            .config
            .tax(fuel_cost + delivery_fee, self.pricing.state_code.as_deref());
        let total_amount = fuel_cost + delivery_fee + tax + tip;
        let company_markup = self.pricing.config.fuel_markup(base_cost);

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: cmd.customer_id,
            address_id: cmd.address_id,
            driver_id: None,
            order_number: generate_order_number(ORDER_NUMBER_PREFIX),
            delivery_type: cmd.delivery_type,
            status: OrderStatus::Pending,
            payment_method: cmd.payment_method,
            payment_status: PaymentStatus::Pending,
            fuel_cost,
            company_markup,
            distance,
            delivery_fee,
            tax,
            tip,
            total_amount,
            items,
            delivery_date: cmd.delivery_date,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            delivered_at: None,
            cancelled_at: None,
        };

        // A number collision is caught by the store's uniqueness
        // constraint; regenerate once and retry.
        let mut first_attempt = true;
        let saved = retry_with_backoff(
            RetryConfig::single_retry(),
            || {
                let mut order = order.clone();
                if !first_attempt {
                    order.order_number = generate_order_number(ORDER_NUMBER_PREFIX);
                }
                first_attempt = false;
                self.repos.orders().insert(order)
            },
            DomainError::is_transient,
            "insert_order",
        )
        .await?;

        metrics::counter!("orders_created_total", "type" => "fuel").increment(1);
        info!(
            order_id = %saved.id,
            order_number = %saved.order_number,
            total = %saved.total_amount,
            "Fuel order created"
        );

        self.event_bus.publish(Event::OrderStatusChanged {
            order_id: saved.id.clone(),
            order_number: saved.order_number.clone(),
            customer_id: saved.customer_id.clone(),
            driver_id: None,
            status: saved.status,
        });

        Ok(saved)
    }

    pub async fn get(&self, order_id: &str, actor: &Actor) -> DomainResult<Order> {
        let order = self.find(order_id).await?;
        self.check_access(&order, actor)?;
        Ok(order)
    }

    pub async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        self.repos
            .orders()
            .list_for_customer(customer_id, page, limit)
            .await
    }

    pub async fn list_all(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        self.repos.orders().list_all(status, page, limit).await
    }

    /// Advance the order status. The transition graph binds every
    /// caller; drivers may only advance their own orders along the
    /// delivery path, admins may apply any valid transition.
    pub async fn set_status(
        &self,
        order_id: &str,
        next: OrderStatus,
        actor: &Actor,
    ) -> DomainResult<Order> {
        let mut order = self.find(order_id).await?;

        match actor {
            Actor::Admin => {}
            Actor::Driver(driver_id) => {
                if order.driver_id.as_deref() != Some(driver_id.as_str()) {
                    return Err(DomainError::Forbidden(
                        "Order is not assigned to this driver".to_string(),
                    ));
                }
                if !matches!(
                    next,
                    OrderStatus::Dispatched | OrderStatus::InTransit | OrderStatus::Delivered
                ) {
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

        // Conditional write: a concurrent transition that landed first
        // leaves the expected status unmatched and surfaces as Conflict
        let expected = order.status;
        order.apply_status(next)?;
        self.repos.orders().update_transition(&order, expected).await?;

        metrics::counter!("order_status_transitions_total", "type" => "fuel", "status" => next.as_str())
            .increment(1);
        info!(order_id = %order.id, status = %order.status, "Order status updated");

        self.event_bus.publish(Event::OrderStatusChanged {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            driver_id: order.driver_id.clone(),
            status: order.status,
        });

        Ok(order)
    }

    /// Customer-initiated cancellation, restricted beyond the graph:
    /// once the order is on the road it can no longer be cancelled.
    pub async fn customer_cancel(
        &self,
        order_id: &str,
        customer_id: &str,
        reason: Option<String>,
    ) -> DomainResult<Order> {
        let mut order = self.find(order_id).await?;
        if order.customer_id != customer_id {
            return Err(DomainError::NotFound {
                entity: "Order",
                field: "id",
                value: order_id.to_string(),
            });
        }

        let expected = order.status;
        order.customer_cancel(reason)?;
        self.repos.orders().update_transition(&order, expected).await?;

        info!(order_id = %order.id, "Order cancelled by customer");
        self.event_bus.publish(Event::OrderStatusChanged {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            driver_id: order.driver_id.clone(),
            status: order.status,
        });

        Ok(order)
    }

    async fn find(&self, order_id: &str) -> DomainResult<Order> {
        self.repos
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Order",
                field: "id",
                value: order_id.to_string(),
            })
    }

    fn check_access(&self, order: &Order, actor: &Actor) -> DomainResult<()> {
        let allowed = match actor {
            Actor::Admin => true,
            Actor::Customer(id) => order.customer_id == *id,
            Actor::Driver(id) => order.driver_id.as_deref() == Some(id.as_str()),
        };
        if allowed {
            Ok(())
        } else {
            Err(DomainError::NotFound {
                entity: "Order",
                field: "id",
                value: order.id.clone(),
            })
        }
    }
}
