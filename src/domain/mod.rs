//! Core business entities, types and traits

pub mod address;
pub mod car;
pub mod charging_order;
pub mod driver;
pub mod error;
pub mod order;
pub mod payout;
pub mod ports;
pub mod pricing;
pub mod product;
pub mod repositories;

// Re-export commonly used types
pub use address::{Address, AddressRepository};
pub use car::{Car, CarRepository};
pub use charging_order::{
    ChargingDuration, ChargingOrder, ChargingOrderRepository, ChargingStatus,
};
pub use driver::{Driver, DriverLocation, DriverRepository};
pub use error::{DomainError, DomainResult};
pub use order::{
    DeliveryType, Order, OrderItem, OrderRepository, OrderStatus, PaymentMethod, PaymentStatus,
};
pub use payout::{DriverPayout, EarningEntry, EarningsSummary, PayoutRepository, PayoutStatus};
pub use ports::{
    ChargeIntent, Geocoder, OrderKind, PaymentGateway, PaymentOutcome, PushSender, TransferOutcome,
};
pub use pricing::{distance_miles, Coordinates, PricingConfig};
pub use product::{Product, ProductRepository};
pub use repositories::RepositoryProvider;
