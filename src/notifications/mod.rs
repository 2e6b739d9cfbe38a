//! Post-commit event bus and fire-and-forget push dispatch

pub mod dispatcher;
pub mod event_bus;
pub mod events;

pub use dispatcher::NotificationDispatcher;
pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage};
