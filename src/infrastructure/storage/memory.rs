//! In-memory repositories for development and testing
//!
//! Dashmap-backed implementation of every repository trait. The two
//! transactional operations (driver assignment, payout reservation)
//! serialize through internal locks to honor the same contract as the
//! database-backed implementation.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::domain::address::{Address, AddressRepository};
use crate::domain::car::{Car, CarRepository};
use crate::domain::charging_order::{ChargingOrder, ChargingOrderRepository, ChargingStatus};
use crate::domain::driver::{Driver, DriverLocation, DriverRepository};
use crate::domain::order::{Order, OrderRepository, OrderStatus, PaymentStatus};
use crate::domain::payout::{DriverPayout, PayoutRepository, PayoutStatus};
use crate::domain::product::{Product, ProductRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DomainError, DomainResult};

#[derive(Default)]
pub struct InMemoryRepositories {
    orders: DashMap<String, Order>,
    charging_orders: DashMap<String, ChargingOrder>,
    drivers: DashMap<String, Driver>,
    locations: DashMap<String, DriverLocation>,
    payouts: DashMap<String, DriverPayout>,
    addresses: DashMap<String, Address>,
    products: DashMap<String, Product>,
    cars: DashMap<String, Car>,
    order_numbers: DashMap<String, ()>,
    // Serialize check-then-set sections the way the DB transaction does
    assign_lock: Mutex<()>,
    payout_lock: Mutex<()>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_order_number(&self, number: &str) -> DomainResult<()> {
        if self.order_numbers.insert(number.to_string(), ()).is_some() {
            return Err(DomainError::Conflict(format!(
                "Duplicate order number {}",
                number
            )));
        }
        Ok(())
    }
}

impl RepositoryProvider for InMemoryRepositories {
    fn orders(&self) -> &dyn OrderRepository {
        self
    }
    fn charging_orders(&self) -> &dyn ChargingOrderRepository {
        self
    }
    fn drivers(&self) -> &dyn DriverRepository {
        self
    }
    fn payouts(&self) -> &dyn PayoutRepository {
        self
    }
    fn addresses(&self) -> &dyn AddressRepository {
        self
    }
    fn products(&self) -> &dyn ProductRepository {
        self
    }
    fn cars(&self) -> &dyn CarRepository {
        self
    }
}

fn paginate<T: Clone>(mut items: Vec<T>, page: u64, limit: u64) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let start = ((page.max(1) - 1) * limit) as usize;
    let items = if start >= items.len() {
        Vec::new()
    } else {
        items.drain(start..).take(limit as usize).collect()
    };
    (items, total)
}

#[async_trait]
impl OrderRepository for InMemoryRepositories {
    async fn insert(&self, order: Order) -> DomainResult<Order> {
        self.claim_order_number(&order.order_number)?;
        self.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>> {
        Ok(self.orders.get(id).map(|o| o.clone()))
    }

    async fn update_transition(&self, order: &Order, expected: OrderStatus) -> DomainResult<()> {
        let mut current = self.orders.get_mut(&order.id).ok_or(DomainError::NotFound {
            entity: "Order",
            field: "id",
            value: order.id.clone(),
        })?;
        if current.status != expected {
            return Err(DomainError::Conflict(format!(
                "Order {} was modified concurrently",
                order.id
            )));
        }
        *current = order.clone();
        Ok(())
    }

    async fn set_payment_status(
        &self,
        order_id: &str,
        status: PaymentStatus,
    ) -> DomainResult<()> {
        let mut order = self.orders.get_mut(order_id).ok_or(DomainError::NotFound {
            entity: "Order",
            field: "id",
            value: order_id.to_string(),
        })?;
        order.payment_status = status;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        let mut items: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .map(|o| o.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(items, page, limit))
    }

    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        let mut items: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .map(|o| o.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(items, page, limit))
    }

    async fn list_earning_for_driver(&self, driver_id: &str) -> DomainResult<Vec<Order>> {
        let mut items: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.driver_id.as_deref() == Some(driver_id) && o.accrues_earnings())
            .map(|o| o.clone())
            .collect();
        items.sort_by(|a, b| b.delivered_at.cmp(&a.delivered_at));
        Ok(items)
    }

    async fn assign_driver(&self, order_id: &str, driver_id: &str) -> DomainResult<Order> {
        let _guard = self.assign_lock.lock().unwrap_or_else(|e| e.into_inner());

        let dispatchable = self
            .drivers
            .get(driver_id)
            .map(|d| d.can_be_dispatched())
            .ok_or(DomainError::NotFound {
                entity: "Driver",
                field: "id",
                value: driver_id.to_string(),
            })?;
        if !dispatchable {
            return Err(DomainError::DriverUnavailable(driver_id.to_string()));
        }

        let mut order = self.orders.get_mut(order_id).ok_or(DomainError::NotFound {
            entity: "Order",
            field: "id",
            value: order_id.to_string(),
        })?;
        order.driver_id = Some(driver_id.to_string());
        if order.status == OrderStatus::Pending {
            order.apply_status(OrderStatus::Confirmed)?;
        } else {
            order.updated_at = Utc::now();
        }
        Ok(order.clone())
    }
}

#[async_trait]
impl ChargingOrderRepository for InMemoryRepositories {
    async fn insert(&self, order: ChargingOrder) -> DomainResult<ChargingOrder> {
        self.claim_order_number(&order.order_number)?;
        self.charging_orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargingOrder>> {
        Ok(self.charging_orders.get(id).map(|o| o.clone()))
    }

    async fn update_transition(
        &self,
        order: &ChargingOrder,
        expected: ChargingStatus,
    ) -> DomainResult<()> {
        let mut current =
            self.charging_orders
                .get_mut(&order.id)
                .ok_or(DomainError::NotFound {
                    entity: "ChargingOrder",
                    field: "id",
                    value: order.id.clone(),
                })?;
        if current.status != expected {
            return Err(DomainError::Conflict(format!(
                "Charging order {} was modified concurrently",
                order.id
            )));
        }
        *current = order.clone();
        Ok(())
    }

    async fn set_payment_status(
        &self,
        order_id: &str,
        status: PaymentStatus,
    ) -> DomainResult<()> {
        let mut order =
            self.charging_orders
                .get_mut(order_id)
                .ok_or(DomainError::NotFound {
                    entity: "ChargingOrder",
                    field: "id",
                    value: order_id.to_string(),
                })?;
        order.payment_status = status;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)> {
        let mut items: Vec<ChargingOrder> = self
            .charging_orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .map(|o| o.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(items, page, limit))
    }

    async fn list_all(
        &self,
        status: Option<ChargingStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)> {
        let mut items: Vec<ChargingOrder> = self
            .charging_orders
            .iter()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .map(|o| o.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(items, page, limit))
    }

    async fn list_earning_for_driver(&self, driver_id: &str) -> DomainResult<Vec<ChargingOrder>> {
        let mut items: Vec<ChargingOrder> = self
            .charging_orders
            .iter()
            .filter(|o| o.driver_id.as_deref() == Some(driver_id) && o.accrues_earnings())
            .map(|o| o.clone())
            .collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(items)
    }

    async fn assign_driver(
        &self,
        order_id: &str,
        driver_id: &str,
        charging_unit_id: Option<&str>,
    ) -> DomainResult<ChargingOrder> {
        let _guard = self.assign_lock.lock().unwrap_or_else(|e| e.into_inner());

        let dispatchable = self
            .drivers
            .get(driver_id)
            .map(|d| d.can_be_dispatched())
            .ok_or(DomainError::NotFound {
                entity: "Driver",
                field: "id",
                value: driver_id.to_string(),
            })?;
        if !dispatchable {
            return Err(DomainError::DriverUnavailable(driver_id.to_string()));
        }

        let mut order =
            self.charging_orders
                .get_mut(order_id)
                .ok_or(DomainError::NotFound {
                    entity: "ChargingOrder",
                    field: "id",
                    value: order_id.to_string(),
                })?;
        order.driver_id = Some(driver_id.to_string());
        order.charging_unit_id = charging_unit_id.map(String::from);
        if order.status == ChargingStatus::Pending {
            order.apply_status(ChargingStatus::Assigned)?;
        } else {
            order.updated_at = Utc::now();
        }
        Ok(order.clone())
    }
}

#[async_trait]
impl DriverRepository for InMemoryRepositories {
    async fn insert(&self, driver: Driver) -> DomainResult<Driver> {
        self.drivers.insert(driver.id.clone(), driver.clone());
        Ok(driver)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Driver>> {
        Ok(self.drivers.get(id).map(|d| d.clone()))
    }

    async fn update(&self, driver: &Driver) -> DomainResult<()> {
        if !self.drivers.contains_key(&driver.id) {
            return Err(DomainError::NotFound {
                entity: "Driver",
                field: "id",
                value: driver.id.clone(),
            });
        }
        self.drivers.insert(driver.id.clone(), driver.clone());
        Ok(())
    }

    async fn list(&self, page: u64, limit: u64) -> DomainResult<(Vec<Driver>, u64)> {
        let mut items: Vec<Driver> = self.drivers.iter().map(|d| d.clone()).collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(paginate(items, page, limit))
    }

    async fn set_availability(&self, driver_id: &str, available: bool) -> DomainResult<()> {
        let mut driver = self
            .drivers
            .get_mut(driver_id)
            .ok_or(DomainError::NotFound {
                entity: "Driver",
                field: "id",
                value: driver_id.to_string(),
            })?;
        driver.is_available = available;
        driver.updated_at = Utc::now();
        Ok(())
    }

    async fn upsert_location(&self, location: DriverLocation) -> DomainResult<()> {
        self.locations
            .insert(location.driver_id.clone(), location);
        Ok(())
    }

    async fn find_location(&self, driver_id: &str) -> DomainResult<Option<DriverLocation>> {
        Ok(self.locations.get(driver_id).map(|l| l.clone()))
    }
}

#[async_trait]
impl PayoutRepository for InMemoryRepositories {
    async fn reserve(
        &self,
        payout: DriverPayout,
        total_earned: Decimal,
    ) -> DomainResult<DriverPayout> {
        let _guard = self.payout_lock.lock().unwrap_or_else(|e| e.into_inner());

        // PENDING rows count as spoken-for while their transfer is in
        // flight, so concurrent requests cannot double-draw
        let reserved: Decimal = self
            .payouts
            .iter()
            .filter(|p| {
                p.driver_id == payout.driver_id
                    && matches!(p.status, PayoutStatus::Pending | PayoutStatus::Succeeded)
            })
            .map(|p| p.amount)
            .sum();
        let available = (total_earned - reserved).max(Decimal::ZERO);
        if payout.amount > available {
            return Err(DomainError::InsufficientBalance {
                requested: payout.amount,
                available,
            });
        }

        self.payouts.insert(payout.id.clone(), payout.clone());
        Ok(payout)
    }

    async fn finalize(
        &self,
        payout_id: &str,
        status: PayoutStatus,
        external_transfer_id: Option<String>,
        failure_reason: Option<String>,
    ) -> DomainResult<DriverPayout> {
        let mut payout = self
            .payouts
            .get_mut(payout_id)
            .ok_or(DomainError::NotFound {
                entity: "DriverPayout",
                field: "id",
                value: payout_id.to_string(),
            })?;
        if payout.status != PayoutStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Payout {} is already finalized",
                payout_id
            )));
        }
        payout.status = status;
        payout.external_transfer_id = external_transfer_id;
        payout.failure_reason = failure_reason;
        payout.updated_at = Utc::now();
        Ok(payout.clone())
    }

    async fn list_for_driver(&self, driver_id: &str) -> DomainResult<Vec<DriverPayout>> {
        let mut items: Vec<DriverPayout> = self
            .payouts
            .iter()
            .filter(|p| p.driver_id == driver_id)
            .map(|p| p.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn total_paid_out(&self, driver_id: &str) -> DomainResult<Decimal> {
        Ok(self
            .payouts
            .iter()
            .filter(|p| p.driver_id == driver_id && p.status == PayoutStatus::Succeeded)
            .map(|p| p.amount)
            .sum())
    }
}

#[async_trait]
impl AddressRepository for InMemoryRepositories {
    async fn insert(&self, address: Address) -> DomainResult<Address> {
        self.addresses.insert(address.id.clone(), address.clone());
        Ok(address)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Address>> {
        Ok(self.addresses.get(id).map(|a| a.clone()))
    }

    async fn list_for_customer(&self, customer_id: &str) -> DomainResult<Vec<Address>> {
        Ok(self
            .addresses
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .map(|a| a.clone())
            .collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.addresses.remove(id).ok_or(DomainError::NotFound {
            entity: "Address",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepositories {
    async fn insert(&self, product: Product) -> DomainResult<Product> {
        self.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Product>> {
        Ok(self.products.get(id).map(|p| p.clone()))
    }

    async fn update(&self, product: &Product) -> DomainResult<()> {
        if !self.products.contains_key(&product.id) {
            return Err(DomainError::NotFound {
                entity: "Product",
                field: "id",
                value: product.id.clone(),
            });
        }
        self.products.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn list(&self, only_available: bool) -> DomainResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| !only_available || p.is_available)
            .map(|p| p.clone())
            .collect())
    }
}

#[async_trait]
impl CarRepository for InMemoryRepositories {
    async fn insert(&self, car: Car) -> DomainResult<Car> {
        self.cars.insert(car.id.clone(), car.clone());
        Ok(car)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Car>> {
        Ok(self.cars.get(id).map(|c| c.clone()))
    }

    async fn list_for_customer(&self, customer_id: &str) -> DomainResult<Vec<Car>> {
        Ok(self
            .cars
            .iter()
            .filter(|c| c.customer_id == customer_id)
            .map(|c| c.clone())
            .collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.cars.remove(id).ok_or(DomainError::NotFound {
            entity: "Car",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }
}
