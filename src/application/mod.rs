//! Business logic layer

pub mod services;

pub use services::{
    Actor, ChargingService, DispatchService, EarningsService, OrderService, PaymentSyncService,
    PricingContext,
};
