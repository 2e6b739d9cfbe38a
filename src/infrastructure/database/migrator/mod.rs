//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_products;
mod m20250301_000002_create_addresses;
mod m20250301_000003_create_cars;
mod m20250301_000004_create_drivers;
mod m20250301_000005_create_orders;
mod m20250301_000006_create_charging_orders;
mod m20250301_000007_create_driver_locations;
mod m20250301_000008_create_driver_payouts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_products::Migration),
            Box::new(m20250301_000002_create_addresses::Migration),
            Box::new(m20250301_000003_create_cars::Migration),
            Box::new(m20250301_000004_create_drivers::Migration),
            Box::new(m20250301_000005_create_orders::Migration),
            Box::new(m20250301_000006_create_charging_orders::Migration),
            Box::new(m20250301_000007_create_driver_locations::Migration),
            Box::new(m20250301_000008_create_driver_payouts::Migration),
        ]
    }
}
