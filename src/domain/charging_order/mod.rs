//! EV charging order aggregate

pub mod model;
pub mod repository;

pub use model::{
    ChargingDuration, ChargingOrder, ChargingStatus, CHARGING_NUMBER_PREFIX, MAX_CARS, MIN_CARS,
};
pub use repository::ChargingOrderRepository;
