//! # PetroTap Order Engine
//!
//! Order lifecycle, pricing and settlement service for an on-demand
//! fuel-delivery and mobile EV-charging marketplace.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Business logic services, one per engine component
//! - **infrastructure**: Persistence (SeaORM/SQLite) and outbound HTTP
//!   clients (payment gateway, geocoder, push)
//! - **api**: REST API with Swagger documentation
//! - **auth**: JWT verification for tokens issued by the identity service
//! - **notifications**: Post-commit event bus and push dispatch

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, SeaOrmRepositoryProvider};

// Re-export API router
pub use api::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
