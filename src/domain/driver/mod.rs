//! Driver aggregate

pub mod model;
pub mod repository;

pub use model::{Driver, DriverLocation};
pub use repository::DriverRepository;
