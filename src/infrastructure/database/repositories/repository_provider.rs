//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::address::AddressRepository;
use crate::domain::car::CarRepository;
use crate::domain::charging_order::ChargingOrderRepository;
use crate::domain::driver::DriverRepository;
use crate::domain::order::OrderRepository;
use crate::domain::payout::PayoutRepository;
use crate::domain::product::ProductRepository;
use crate::domain::repositories::RepositoryProvider;

use super::address_repository::SeaOrmAddressRepository;
use super::car_repository::SeaOrmCarRepository;
use super::charging_order_repository::SeaOrmChargingOrderRepository;
use super::driver_repository::SeaOrmDriverRepository;
use super::order_repository::SeaOrmOrderRepository;
use super::payout_repository::SeaOrmPayoutRepository;
use super::product_repository::SeaOrmProductRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository
/// accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let order = repos.orders().find_by_id("...").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    orders: SeaOrmOrderRepository,
    charging_orders: SeaOrmChargingOrderRepository,
    drivers: SeaOrmDriverRepository,
    payouts: SeaOrmPayoutRepository,
    addresses: SeaOrmAddressRepository,
    products: SeaOrmProductRepository,
    cars: SeaOrmCarRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            orders: SeaOrmOrderRepository::new(db.clone()),
            charging_orders: SeaOrmChargingOrderRepository::new(db.clone()),
            drivers: SeaOrmDriverRepository::new(db.clone()),
            payouts: SeaOrmPayoutRepository::new(db.clone()),
            addresses: SeaOrmAddressRepository::new(db.clone()),
            products: SeaOrmProductRepository::new(db.clone()),
            cars: SeaOrmCarRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    fn charging_orders(&self) -> &dyn ChargingOrderRepository {
        &self.charging_orders
    }

    fn drivers(&self) -> &dyn DriverRepository {
        &self.drivers
    }

    fn payouts(&self) -> &dyn PayoutRepository {
        &self.payouts
    }

    fn addresses(&self) -> &dyn AddressRepository {
        &self.addresses
    }

    fn products(&self) -> &dyn ProductRepository {
        &self.products
    }

    fn cars(&self) -> &dyn CarRepository {
        &self.cars
    }
}
