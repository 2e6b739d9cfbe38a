//! Database entities module

pub mod address;
pub mod car;
pub mod charging_order;
pub mod charging_order_car;
pub mod driver;
pub mod driver_location;
pub mod driver_payout;
pub mod order;
pub mod order_item;
pub mod product;

pub use address::Entity as Address;
pub use car::Entity as Car;
pub use charging_order::Entity as ChargingOrder;
pub use charging_order_car::Entity as ChargingOrderCar;
pub use driver::Entity as Driver;
pub use driver_location::Entity as DriverLocation;
pub use driver_payout::Entity as DriverPayout;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
pub use product::Entity as Product;
