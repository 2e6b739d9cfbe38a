//! Fuel delivery order aggregate

pub mod model;
pub mod repository;

pub use model::{
    generate_order_number, DeliveryType, Order, OrderItem, OrderStatus, PaymentMethod,
    PaymentStatus, MAX_QUANTITY_LITERS, MIN_QUANTITY_LITERS, ORDER_NUMBER_PREFIX,
};
pub use repository::OrderRepository;
