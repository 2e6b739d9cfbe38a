//! Service-level tests against the in-memory repositories.
//!
//! Exercise the full command paths: pricing, lifecycle transitions,
//! dispatch, payment synchronization and the payout ledger.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::charging::CreateChargingOrder;
use super::dispatch::RegisterDriver;
use super::order::{CreateOrder, NewOrderItem};
use super::payments::PaymentCallback;
use super::{
    Actor, ChargingService, DispatchService, EarningsService, OrderService, PaymentSyncService,
    PricingContext,
};
use crate::domain::address::{Address, AddressRepository};
use crate::domain::car::CarRepository;
use crate::domain::charging_order::{
    ChargingDuration, ChargingOrder, ChargingOrderRepository, ChargingStatus,
    CHARGING_NUMBER_PREFIX,
};
use crate::domain::driver::DriverRepository;
use crate::domain::order::{
    generate_order_number, DeliveryType, Order, OrderRepository, OrderStatus, PaymentMethod,
    PaymentStatus, ORDER_NUMBER_PREFIX,
};
use crate::domain::payout::{PayoutRepository, PayoutStatus};
use crate::domain::pricing::{Coordinates, PricingConfig};
use crate::domain::product::{Product, ProductRepository};
use crate::domain::{
    ChargeIntent, DomainError, DomainResult, OrderKind, PaymentGateway, PaymentOutcome,
    RepositoryProvider, TransferOutcome,
};
use crate::infrastructure::storage::InMemoryRepositories;
use crate::notifications::create_event_bus;

/// Gateway stub with scriptable outcomes.
struct StubGateway {
    outcome: PaymentOutcome,
    fail_transfer: bool,
    refund_total: Decimal,
}

impl StubGateway {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            outcome: PaymentOutcome::Succeeded,
            fail_transfer: false,
            refund_total: Decimal::ZERO,
        })
    }

    fn reporting(outcome: PaymentOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            fail_transfer: false,
            refund_total: Decimal::ZERO,
        })
    }

    fn declining_transfers() -> Arc<Self> {
        Arc::new(Self {
            outcome: PaymentOutcome::Succeeded,
            fail_transfer: true,
            refund_total: Decimal::ZERO,
        })
    }

    fn refunding(total: Decimal) -> Arc<Self> {
        Arc::new(Self {
            outcome: PaymentOutcome::Succeeded,
            fail_transfer: false,
            refund_total: total,
        })
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_charge_intent(
        &self,
        amount: Decimal,
        currency: &str,
        _order_id: &str,
        _order_kind: OrderKind,
    ) -> DomainResult<ChargeIntent> {
        Ok(ChargeIntent {
            id: "pi_test".to_string(),
            client_secret: Some("pi_test_secret".to_string()),
            amount,
            currency: currency.to_string(),
        })
    }

    async fn retrieve_outcome(&self, _payment_id: &str) -> DomainResult<PaymentOutcome> {
        Ok(self.outcome)
    }

    async fn refund(&self, _payment_id: &str, _amount: Decimal) -> DomainResult<Decimal> {
        Ok(self.refund_total)
    }

    async fn transfer(
        &self,
        _destination_account: &str,
        _amount: Decimal,
        _currency: &str,
    ) -> DomainResult<TransferOutcome> {
        if self.fail_transfer {
            Ok(TransferOutcome::Failed {
                reason: "insufficient_funds".to_string(),
            })
        } else {
            Ok(TransferOutcome::Succeeded {
                transfer_id: "tr_test".to_string(),
            })
        }
    }
}

fn pricing_context() -> PricingContext {
    PricingContext {
        config: PricingConfig::default(),
        origin: Coordinates::new(29.7604, -95.3698),
        state_code: Some("TX".to_string()),
    }
}

struct Harness {
    repos: Arc<InMemoryRepositories>,
    orders: OrderService,
    charging: ChargingService,
    dispatch: DispatchService,
}

fn harness() -> Harness {
    let repos = Arc::new(InMemoryRepositories::new());
    let bus = create_event_bus();
    let provider: Arc<dyn RepositoryProvider> = repos.clone();
    Harness {
        repos: repos.clone(),
        orders: OrderService::new(provider.clone(), bus.clone(), pricing_context()),
        charging: ChargingService::new(provider.clone(), bus.clone(), pricing_context()),
        dispatch: DispatchService::new(provider, bus),
    }
}

async fn seed_address(repos: &InMemoryRepositories, customer_id: &str, geocoded: bool) -> Address {
    let now = Utc::now();
    let address = Address {
        id: Uuid::new_v4().to_string(),
        customer_id: customer_id.to_string(),
        label: "Home".to_string(),
        street: "500 Main St".to_string(),
        city: "Houston".to_string(),
        state_code: Some("TX".to_string()),
        postal_code: Some("77002".to_string()),
        // Same point as the depot: zero distance, zero delivery fee
        coordinates: geocoded.then(|| Coordinates::new(29.7604, -95.3698)),
        created_at: now,
        updated_at: now,
    };
    repos.addresses().insert(address).await.unwrap()
}

async fn seed_product(repos: &InMemoryRepositories, base_price: Decimal) -> Product {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: "Diesel".to_string(),
        description: None,
        base_price,
        is_available: true,
        created_at: now,
        updated_at: now,
    };
    repos.products().insert(product).await.unwrap()
}

async fn seed_available_driver(dispatch: &DispatchService, payout_account: Option<&str>) -> String {
    let driver = dispatch
        .register_driver(RegisterDriver {
            name: "Alex".to_string(),
            phone: None,
            vehicle_make: None,
            vehicle_model: None,
            vehicle_plate: None,
            payout_account_id: payout_account.map(String::from),
        })
        .await
        .unwrap();
    dispatch.set_availability(&driver.id, true).await.unwrap();
    driver.id
}

fn create_cmd(customer: &str, address: &str, product: &str, quantity: i32) -> CreateOrder {
    CreateOrder {
        customer_id: customer.to_string(),
        address_id: address.to_string(),
        delivery_type: DeliveryType::Private,
        payment_method: PaymentMethod::CashOnDelivery,
        items: vec![NewOrderItem {
            product_id: product.to_string(),
            quantity,
        }],
        tip: None,
        delivery_date: None,
    }
}

/// A delivered-and-paid fuel order inserted directly, for earnings tests.
async fn seed_earning_order(
    repos: &InMemoryRepositories,
    driver_id: &str,
    delivery_fee: Decimal,
    tip: Decimal,
) -> Order {
    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4().to_string(),
        customer_id: "cust-1".to_string(),
        address_id: "addr-1".to_string(),
        driver_id: Some(driver_id.to_string()),
        order_number: generate_order_number(ORDER_NUMBER_PREFIX),
        delivery_type: DeliveryType::Private,
        status: OrderStatus::Delivered,
        payment_method: PaymentMethod::CashOnDelivery,
        payment_status: PaymentStatus::Paid,
        fuel_cost: dec!(100),
        company_markup: dec!(0.10),
        distance: dec!(2),
        delivery_fee,
        tax: dec!(6),
        tip,
        total_amount: dec!(100) + delivery_fee + dec!(6) + tip,
        items: vec![],
        delivery_date: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
        delivered_at: Some(now),
        cancelled_at: None,
    };
    repos.orders().insert(order.clone()).await.unwrap();
    order
}

/// A completed-and-paid charging order inserted directly, for earnings
/// tests.
async fn seed_charging_earning_order(
    repos: &InMemoryRepositories,
    driver_id: &str,
    delivery_fee: Decimal,
    tip: Decimal,
) -> ChargingOrder {
    let now = Utc::now();
    let order = ChargingOrder {
        id: Uuid::new_v4().to_string(),
        customer_id: "cust-1".to_string(),
        address_id: "addr-1".to_string(),
        driver_id: Some(driver_id.to_string()),
        charging_unit_id: None,
        order_number: generate_order_number(CHARGING_NUMBER_PREFIX),
        charging_duration: ChargingDuration::OneHour,
        number_of_cars: 1,
        car_ids: vec!["car-1".to_string()],
        base_fee: dec!(25),
        distance: dec!(2),
        delivery_fee,
        tax: dec!(1.50),
        tip,
        total_amount: dec!(25) + delivery_fee + dec!(1.50) + tip,
        status: ChargingStatus::Completed,
        payment_method: PaymentMethod::Online,
        payment_status: PaymentStatus::Paid,
        scheduled_at: None,
        notes: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
        started_at: Some(now),
        completed_at: Some(now),
        cancelled_at: None,
    };
    repos
        .charging_orders()
        .insert(order.clone())
        .await
        .unwrap();
    order
}

// ── Order creation and pricing ─────────────────────────────────

#[tokio::test]
async fn create_order_prices_off_the_catalog() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;

    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();

    // unit price 3.50 (markup rounds away), 100 L, zero distance
    assert_eq!(order.fuel_cost, dec!(350.00));
    assert_eq!(order.distance, dec!(0));
    assert_eq!(order.delivery_fee, dec!(0));
    assert_eq!(order.tax, dec!(21.00));
    assert_eq!(order.total_amount, dec!(371.00));
    assert_eq!(order.company_markup, dec!(0.33));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert!(order.driver_id.is_none());
    assert!(order.order_number.starts_with("PT-"));
}

#[tokio::test]
async fn create_order_rejects_ungeocoded_address() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", false).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;

    let err = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AddressNotGeocoded(_)));
}

#[tokio::test]
async fn create_order_rejects_out_of_range_quantity() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;

    let err = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidQuantity { .. }));
}

#[tokio::test]
async fn quantity_bounds_are_inclusive() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;

    for quantity in [49, 5001] {
        let err = h
            .orders
            .create(create_cmd("cust-1", &address.id, &product.id, quantity))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::InvalidQuantity { .. }),
            "{} liters should be rejected",
            quantity
        );
    }
    for quantity in [50, 5000] {
        h.orders
            .create(create_cmd("cust-1", &address.id, &product.id, quantity))
            .await
            .unwrap_or_else(|e| panic!("{} liters should be accepted: {}", quantity, e));
    }
}

/// Order store that rejects the first insert with a duplicate-number
/// conflict and records every attempted number.
struct CollidingOrders {
    inner: Arc<InMemoryRepositories>,
    attempts: Mutex<Vec<String>>,
}

#[async_trait]
impl OrderRepository for CollidingOrders {
    async fn insert(&self, order: Order) -> DomainResult<Order> {
        let first = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(order.order_number.clone());
            attempts.len() == 1
        };
        if first {
            return Err(DomainError::Conflict(format!(
                "Duplicate order number {}",
                order.order_number
            )));
        }
        self.inner.orders().insert(order).await
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>> {
        self.inner.orders().find_by_id(id).await
    }

    async fn update_transition(&self, order: &Order, expected: OrderStatus) -> DomainResult<()> {
        self.inner.orders().update_transition(order, expected).await
    }

    async fn set_payment_status(
        &self,
        order_id: &str,
        status: PaymentStatus,
    ) -> DomainResult<()> {
        self.inner.orders().set_payment_status(order_id, status).await
    }

    async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        self.inner
            .orders()
            .list_for_customer(customer_id, page, limit)
            .await
    }

    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        self.inner.orders().list_all(status, page, limit).await
    }

    async fn list_earning_for_driver(&self, driver_id: &str) -> DomainResult<Vec<Order>> {
        self.inner.orders().list_earning_for_driver(driver_id).await
    }

    async fn assign_driver(&self, order_id: &str, driver_id: &str) -> DomainResult<Order> {
        self.inner.orders().assign_driver(order_id, driver_id).await
    }
}

struct CollidingProvider {
    inner: Arc<InMemoryRepositories>,
    orders: CollidingOrders,
}

impl RepositoryProvider for CollidingProvider {
    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }
    fn charging_orders(&self) -> &dyn ChargingOrderRepository {
        self.inner.charging_orders()
    }
    fn drivers(&self) -> &dyn DriverRepository {
        self.inner.drivers()
    }
    fn payouts(&self) -> &dyn PayoutRepository {
        self.inner.payouts()
    }
    fn addresses(&self) -> &dyn AddressRepository {
        self.inner.addresses()
    }
    fn products(&self) -> &dyn ProductRepository {
        self.inner.products()
    }
    fn cars(&self) -> &dyn CarRepository {
        self.inner.cars()
    }
}

#[tokio::test]
async fn order_number_collision_regenerates_once() {
    let repos = Arc::new(InMemoryRepositories::new());
    let provider = Arc::new(CollidingProvider {
        inner: repos.clone(),
        orders: CollidingOrders {
            inner: repos.clone(),
            attempts: Mutex::new(Vec::new()),
        },
    });
    let orders = OrderService::new(provider.clone(), create_event_bus(), pricing_context());

    let address = seed_address(&repos, "cust-1", true).await;
    let product = seed_product(&repos, dec!(3.50)).await;
    let saved = orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();

    // First attempt keeps the built number; the retry regenerates
    let attempts = provider.orders.attempts.lock().unwrap().clone();
    assert_eq!(attempts.len(), 2);
    assert_ne!(attempts[0], attempts[1]);
    assert_eq!(saved.order_number, attempts[1]);
}

#[tokio::test]
async fn create_order_rejects_someone_elses_address() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-2", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;

    let err = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

// ── Dispatch ───────────────────────────────────────────────────

#[tokio::test]
async fn assignment_confirms_order_and_requires_availability() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();
    let driver_id = seed_available_driver(&h.dispatch, None).await;

    h.dispatch
        .assign_driver(OrderKind::Fuel, &order.id, &driver_id, None)
        .await
        .unwrap();

    let order = h.orders.get(&order.id, &Actor::Admin).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.driver_id.as_deref(), Some(driver_id.as_str()));
}

#[tokio::test]
async fn assignment_refuses_unavailable_driver() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();
    let driver_id = seed_available_driver(&h.dispatch, None).await;
    h.dispatch
        .set_availability(&driver_id, false)
        .await
        .unwrap();

    let err = h
        .dispatch
        .assign_driver(OrderKind::Fuel, &order.id, &driver_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DriverUnavailable(_)));

    // Order is untouched
    let order = h.orders.get(&order.id, &Actor::Admin).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.driver_id.is_none());
}

// ── Lifecycle ──────────────────────────────────────────────────

#[tokio::test]
async fn driver_advances_to_delivery_and_cod_settles() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();
    let driver_id = seed_available_driver(&h.dispatch, None).await;
    h.dispatch
        .assign_driver(OrderKind::Fuel, &order.id, &driver_id, None)
        .await
        .unwrap();

    let driver = Actor::Driver(driver_id.clone());
    for next in [
        OrderStatus::Dispatched,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ] {
        h.orders.set_status(&order.id, next, &driver).await.unwrap();
    }

    let order = h.orders.get(&order.id, &Actor::Admin).await.unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert!(order.delivered_at.is_some());
}

#[tokio::test]
async fn driver_cannot_touch_someone_elses_order() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();

    let err = h
        .orders
        .set_status(
            &order.id,
            OrderStatus::Dispatched,
            &Actor::Driver("other-driver".to_string()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn customer_cancel_refused_after_dispatch() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();
    let driver_id = seed_available_driver(&h.dispatch, None).await;
    h.dispatch
        .assign_driver(OrderKind::Fuel, &order.id, &driver_id, None)
        .await
        .unwrap();
    h.orders
        .set_status(&order.id, OrderStatus::Dispatched, &Actor::Admin)
        .await
        .unwrap();

    let err = h
        .orders
        .customer_cancel(&order.id, "cust-1", Some("too late".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IllegalCancellation { .. }));
}

#[tokio::test]
async fn stale_transition_is_rejected() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();
    let driver_id = seed_available_driver(&h.dispatch, None).await;
    h.dispatch
        .assign_driver(OrderKind::Fuel, &order.id, &driver_id, None)
        .await
        .unwrap();
    for next in [OrderStatus::Dispatched, OrderStatus::InTransit] {
        h.orders
            .set_status(&order.id, next, &Actor::Admin)
            .await
            .unwrap();
    }

    // Two writers both read the order IN_TRANSIT
    let base = h.orders.get(&order.id, &Actor::Admin).await.unwrap();
    let mut delivered = base.clone();
    delivered.apply_status(OrderStatus::Delivered).unwrap();
    let mut cancelled = base.clone();
    cancelled.apply_status(OrderStatus::Cancelled).unwrap();

    h.repos
        .orders()
        .update_transition(&delivered, OrderStatus::InTransit)
        .await
        .unwrap();
    let err = h
        .repos
        .orders()
        .update_transition(&cancelled, OrderStatus::InTransit)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // The delivery is not lost
    let stored = h.orders.get(&order.id, &Actor::Admin).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Delivered);
}

// ── Charging orders ────────────────────────────────────────────

#[tokio::test]
async fn charging_order_prices_per_car() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;
    let mut car_ids = Vec::new();
    for _ in 0..2 {
        let car = crate::domain::car::Car {
            id: Uuid::new_v4().to_string(),
            customer_id: "cust-1".to_string(),
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            plate: None,
            created_at: Utc::now(),
        };
        car_ids.push(h.repos.cars().insert(car).await.unwrap().id);
    }

    let order = h
        .charging
        .create(CreateChargingOrder {
            customer_id: "cust-1".to_string(),
            address_id: address.id,
            charging_duration: ChargingDuration::TwoHours,
            number_of_cars: 2,
            car_ids,
            payment_method: PaymentMethod::Online,
            tip: Some(dec!(10)),
            scheduled_at: None,
            notes: None,
        })
        .await
        .unwrap();

    // 2 cars x 45, zero distance, 6% tax on 90
    assert_eq!(order.base_fee, dec!(90));
    assert_eq!(order.delivery_fee, dec!(0));
    assert_eq!(order.tax, dec!(5.40));
    assert_eq!(order.total_amount, dec!(105.40));
    assert!(order.order_number.starts_with("CHG-"));
}

#[tokio::test]
async fn charging_order_requires_matching_car_count() {
    let h = harness();
    let address = seed_address(&h.repos, "cust-1", true).await;

    let err = h
        .charging
        .create(CreateChargingOrder {
            customer_id: "cust-1".to_string(),
            address_id: address.id,
            charging_duration: ChargingDuration::OneHour,
            number_of_cars: 2,
            car_ids: vec!["car-1".to_string()],
            payment_method: PaymentMethod::Online,
            tip: None,
            scheduled_at: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

// ── Payment synchronization ────────────────────────────────────

#[tokio::test]
async fn callback_is_idempotent() {
    let h = harness();
    let bus = create_event_bus();
    let provider: Arc<dyn RepositoryProvider> = h.repos.clone();
    let payments = PaymentSyncService::new(
        provider,
        StubGateway::succeeding(),
        bus,
        "usd".to_string(),
    );

    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let mut cmd = create_cmd("cust-1", &address.id, &product.id, 100);
    cmd.payment_method = PaymentMethod::Online;
    let order = h.orders.create(cmd).await.unwrap();

    let callback = PaymentCallback {
        external_payment_id: "pi_test".to_string(),
        claimed_outcome: PaymentOutcome::Succeeded,
        order_id: order.id.clone(),
        order_kind: OrderKind::Fuel,
    };
    assert_eq!(
        payments.apply(callback.clone()).await.unwrap(),
        PaymentStatus::Paid
    );
    // Re-delivery assigns the same terminal status
    assert_eq!(
        payments.apply(callback).await.unwrap(),
        PaymentStatus::Paid
    );

    let order = h.orders.get(&order.id, &Actor::Admin).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn callback_cannot_claim_more_than_the_processor() {
    let h = harness();
    let provider: Arc<dyn RepositoryProvider> = h.repos.clone();
    let payments = PaymentSyncService::new(
        provider,
        StubGateway::reporting(PaymentOutcome::Failed),
        create_event_bus(),
        "usd".to_string(),
    );

    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let mut cmd = create_cmd("cust-1", &address.id, &product.id, 100);
    cmd.payment_method = PaymentMethod::Online;
    let order = h.orders.create(cmd).await.unwrap();

    // The caller claims success; the processor says the charge failed
    let status = payments
        .apply(PaymentCallback {
            external_payment_id: "pi_forged".to_string(),
            claimed_outcome: PaymentOutcome::Succeeded,
            order_id: order.id.clone(),
            order_kind: OrderKind::Fuel,
        })
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Failed);

    let order = h.orders.get(&order.id, &Actor::Admin).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Failed);
}

#[tokio::test]
async fn create_intent_refuses_on_delivery_orders() {
    let h = harness();
    let bus = create_event_bus();
    let provider: Arc<dyn RepositoryProvider> = h.repos.clone();
    let payments = PaymentSyncService::new(
        provider,
        StubGateway::succeeding(),
        bus,
        "usd".to_string(),
    );

    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let order = h
        .orders
        .create(create_cmd("cust-1", &address.id, &product.id, 100))
        .await
        .unwrap();

    let err = payments
        .create_intent(&order.id, OrderKind::Fuel)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn full_refund_flips_status_partial_does_not() {
    let h = harness();
    let provider: Arc<dyn RepositoryProvider> = h.repos.clone();

    let address = seed_address(&h.repos, "cust-1", true).await;
    let product = seed_product(&h.repos, dec!(3.50)).await;
    let mut cmd = create_cmd("cust-1", &address.id, &product.id, 100);
    cmd.payment_method = PaymentMethod::Online;
    let order = h.orders.create(cmd).await.unwrap();

    // Mark paid first
    let paid = PaymentSyncService::new(
        provider.clone(),
        StubGateway::succeeding(),
        create_event_bus(),
        "usd".to_string(),
    );
    paid.apply(PaymentCallback {
        external_payment_id: "pi_test".to_string(),
        claimed_outcome: PaymentOutcome::Succeeded,
        order_id: order.id.clone(),
        order_kind: OrderKind::Fuel,
    })
    .await
    .unwrap();

    // Partial refund leaves the order PAID
    let partial = PaymentSyncService::new(
        provider.clone(),
        StubGateway::refunding(dec!(100)),
        create_event_bus(),
        "usd".to_string(),
    );
    let status = partial
        .refund(&order.id, OrderKind::Fuel, "pi_test", dec!(100))
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Paid);

    // Cumulative refund covering the total flips it
    let full = PaymentSyncService::new(
        provider,
        StubGateway::refunding(dec!(371.00)),
        create_event_bus(),
        "usd".to_string(),
    );
    let status = full
        .refund(&order.id, OrderKind::Fuel, "pi_test", dec!(271))
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Refunded);
}

// ── Earnings and payouts ───────────────────────────────────────

fn earnings_service(
    repos: &Arc<InMemoryRepositories>,
    gateway: Arc<StubGateway>,
) -> EarningsService {
    let provider: Arc<dyn RepositoryProvider> = repos.clone();
    EarningsService::new(
        provider,
        gateway,
        create_event_bus(),
        dec!(5),
        "usd".to_string(),
    )
}

#[tokio::test]
async fn earnings_accrue_from_delivered_and_paid_orders() {
    let h = harness();
    let driver_id = seed_available_driver(&h.dispatch, Some("acct_1")).await;
    seed_earning_order(&h.repos, &driver_id, dec!(12.50), dec!(5)).await;
    seed_earning_order(&h.repos, &driver_id, dec!(7.50), dec!(0)).await;

    let earnings = earnings_service(&h.repos, StubGateway::succeeding());
    let summary = earnings.compute_earnings(&driver_id).await.unwrap();

    assert_eq!(summary.total_earned, dec!(25));
    assert_eq!(summary.total_paid_out, dec!(0));
    assert_eq!(summary.available_balance, dec!(25));
    assert!(summary.can_withdraw);
    assert_eq!(summary.recent.len(), 2);
}

#[tokio::test]
async fn earnings_mix_fuel_and_charging_minus_payouts() {
    let h = harness();
    let driver_id = seed_available_driver(&h.dispatch, Some("acct_1")).await;
    seed_earning_order(&h.repos, &driver_id, dec!(5.50), dec!(1.50)).await;
    seed_earning_order(&h.repos, &driver_id, dec!(4), dec!(0)).await;
    seed_charging_earning_order(&h.repos, &driver_id, dec!(3), dec!(2)).await;

    let earnings = earnings_service(&h.repos, StubGateway::succeeding());
    let summary = earnings.compute_earnings(&driver_id).await.unwrap();
    assert_eq!(summary.total_earned, dec!(16));
    assert_eq!(summary.recent.len(), 3);

    earnings.request_payout(&driver_id, dec!(10)).await.unwrap();

    let summary = earnings.compute_earnings(&driver_id).await.unwrap();
    assert_eq!(summary.total_paid_out, dec!(10));
    assert_eq!(summary.available_balance, dec!(6));
    assert!(summary.can_withdraw);
}

#[tokio::test]
async fn payout_succeeds_and_reduces_balance() {
    let h = harness();
    let driver_id = seed_available_driver(&h.dispatch, Some("acct_1")).await;
    seed_earning_order(&h.repos, &driver_id, dec!(20), dec!(0)).await;

    let earnings = earnings_service(&h.repos, StubGateway::succeeding());
    let payout = earnings.request_payout(&driver_id, dec!(15)).await.unwrap();
    assert_eq!(payout.status, PayoutStatus::Succeeded);
    assert_eq!(payout.external_transfer_id.as_deref(), Some("tr_test"));

    let summary = earnings.compute_earnings(&driver_id).await.unwrap();
    assert_eq!(summary.total_paid_out, dec!(15));
    assert_eq!(summary.available_balance, dec!(5));
}

#[tokio::test]
async fn over_balance_payout_writes_no_ledger_row() {
    let h = harness();
    let driver_id = seed_available_driver(&h.dispatch, Some("acct_1")).await;
    seed_earning_order(&h.repos, &driver_id, dec!(10), dec!(0)).await;

    let earnings = earnings_service(&h.repos, StubGateway::succeeding());
    let err = earnings
        .request_payout(&driver_id, dec!(50))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InsufficientBalance { .. }));
    assert!(earnings.list_payouts(&driver_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn payout_below_minimum_is_refused() {
    let h = harness();
    let driver_id = seed_available_driver(&h.dispatch, Some("acct_1")).await;
    seed_earning_order(&h.repos, &driver_id, dec!(10), dec!(0)).await;

    let earnings = earnings_service(&h.repos, StubGateway::succeeding());
    let err = earnings
        .request_payout(&driver_id, dec!(2))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn payout_without_destination_is_refused() {
    let h = harness();
    let driver_id = seed_available_driver(&h.dispatch, None).await;
    seed_earning_order(&h.repos, &driver_id, dec!(10), dec!(0)).await;

    let earnings = earnings_service(&h.repos, StubGateway::succeeding());
    let err = earnings
        .request_payout(&driver_id, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn declined_transfer_records_failed_row_and_frees_balance() {
    let h = harness();
    let driver_id = seed_available_driver(&h.dispatch, Some("acct_1")).await;
    seed_earning_order(&h.repos, &driver_id, dec!(20), dec!(0)).await;

    let earnings = earnings_service(&h.repos, StubGateway::declining_transfers());
    let payout = earnings.request_payout(&driver_id, dec!(15)).await.unwrap();
    assert_eq!(payout.status, PayoutStatus::Failed);
    assert_eq!(payout.failure_reason.as_deref(), Some("insufficient_funds"));

    // FAILED rows neither pay out nor reserve
    let summary = earnings.compute_earnings(&driver_id).await.unwrap();
    assert_eq!(summary.total_paid_out, dec!(0));
    assert_eq!(summary.available_balance, dec!(20));

    let ledger = earnings.list_payouts(&driver_id).await.unwrap();
    assert_eq!(ledger.len(), 1);
}
