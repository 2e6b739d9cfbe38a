//! Push notification dispatcher
//!
//! Subscribes to the event bus and forwards events to the push
//! collaborator. Runs as its own task after the state commit that
//! produced the event: a push failure is logged and swallowed, never
//! surfaced to the command that triggered it.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::event_bus::SharedEventBus;
use super::events::Event;
use crate::domain::PushSender;
use crate::shared::shutdown::ShutdownSignal;

/// One (recipient, title, body) push derived from an event.
type Push = (String, String, String);

pub struct NotificationDispatcher {
    event_bus: SharedEventBus,
    push: Arc<dyn PushSender>,
}

impl NotificationDispatcher {
    pub fn new(event_bus: SharedEventBus, push: Arc<dyn PushSender>) -> Self {
        Self { event_bus, push }
    }

    /// Spawn the dispatch loop. Returns immediately.
    pub fn start(self: Arc<Self>, shutdown: ShutdownSignal) {
        tokio::spawn(async move {
            let mut subscriber = self.event_bus.subscribe();
            info!("Notification dispatcher started");

            loop {
                tokio::select! {
                    message = subscriber.recv() => match message {
                        Ok(message) => self.dispatch(&message.event).await,
                        Err(RecvError::Lagged(missed)) => {
                            warn!(missed, "Notification dispatcher lagged; pushes dropped");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = shutdown.wait() => break,
                }
            }

            info!("Notification dispatcher stopped");
        });
    }

    async fn dispatch(&self, event: &Event) {
        for (recipient, title, body) in pushes_for(event) {
            if let Err(e) = self.push.send(&recipient, &title, &body).await {
                // Best-effort: log and move on
                warn!(
                    recipient = %recipient,
                    event = event.event_type(),
                    error = %e,
                    "Push notification failed"
                );
            }
        }
    }
}

/// Map an event to the pushes it triggers.
fn pushes_for(event: &Event) -> Vec<Push> {
    match event {
        Event::OrderStatusChanged {
            order_number,
            customer_id,
            driver_id,
            status,
            ..
        } => {
            let mut out = vec![(
                customer_id.clone(),
                "Order update".to_string(),
                format!("Order {} is now {}", order_number, status),
            )];
            if let Some(driver_id) = driver_id {
                out.push((
                    driver_id.clone(),
                    "Order update".to_string(),
                    format!("Order {} is now {}", order_number, status),
                ));
            }
            out
        }
        Event::ChargingStatusChanged {
            order_number,
            customer_id,
            driver_id,
            status,
            ..
        } => {
            let mut out = vec![(
                customer_id.clone(),
                "Charging update".to_string(),
                format!("Charging order {} is now {}", order_number, status),
            )];
            if let Some(driver_id) = driver_id {
                out.push((
                    driver_id.clone(),
                    "Charging update".to_string(),
                    format!("Charging order {} is now {}", order_number, status),
                ));
            }
            out
        }
        Event::DriverAssigned {
            order_number,
            customer_id,
            driver_id,
            ..
        } => vec![
            (
                driver_id.clone(),
                "New assignment".to_string(),
                format!("You have been assigned order {}", order_number),
            ),
            (
                customer_id.clone(),
                "Driver assigned".to_string(),
                format!("A driver is on order {}", order_number),
            ),
        ],
        Event::PaymentStatusChanged {
            order_number,
            customer_id,
            payment_status,
            ..
        } => vec![(
            customer_id.clone(),
            "Payment update".to_string(),
            format!("Payment for order {} is {}", order_number, payment_status.as_str()),
        )],
        Event::PayoutFinalized {
            driver_id,
            amount,
            status,
            ..
        } => vec![(
            driver_id.clone(),
            "Payout update".to_string(),
            format!("Your payout of {} is {}", amount, status.as_str()),
        )],
    }
}
