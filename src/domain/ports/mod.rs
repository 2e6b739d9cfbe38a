//! Outbound ports — trait seams for the external collaborators.
//!
//! Implementations live in `infrastructure::external`; services receive
//! them as injected `Arc<dyn …>` handles. The core stores only the
//! collaborator's id references and last known outcome, never its
//! internal state.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::Coordinates;
use crate::domain::DomainResult;

/// Which order table a payment reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Fuel,
    Charging,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Charging => "charging",
        }
    }
}

/// Processor-side payment outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

/// A charge intent created at the gateway for an online payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeIntent {
    pub id: String,
    /// Client-side confirmation secret, passed through to the app
    pub client_secret: Option<String>,
    pub amount: Decimal,
    pub currency: String,
}

/// Outcome of a transfer to a connected payout account.
///
/// A declined transfer is a normal outcome, not an error; transport
/// failures surface as `DomainError::ExternalService`.
#[derive(Debug, Clone)]
pub enum TransferOutcome {
    Succeeded { transfer_id: String },
    Failed { reason: String },
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_charge_intent(
        &self,
        amount: Decimal,
        currency: &str,
        order_id: &str,
        order_kind: OrderKind,
    ) -> DomainResult<ChargeIntent>;

    async fn retrieve_outcome(&self, payment_id: &str) -> DomainResult<PaymentOutcome>;

    /// Issue a refund; returns the cumulative refunded amount.
    async fn refund(&self, payment_id: &str, amount: Decimal) -> DomainResult<Decimal>;

    /// Execute a transfer to a driver's connected payout account.
    async fn transfer(
        &self,
        destination_account: &str,
        amount: Decimal,
        currency: &str,
    ) -> DomainResult<TransferOutcome>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-form address to coordinates. "No result" is
    /// `Ok(None)`, never an error.
    async fn geocode(&self, query: &str) -> DomainResult<Option<Coordinates>>;
}

#[async_trait]
pub trait PushSender: Send + Sync {
    /// Fire-and-forget push to a user or driver by id. Callers log and
    /// swallow failures; delivery is never guaranteed.
    async fn send(&self, recipient_id: &str, title: &str, body: &str) -> DomainResult<()>;
}
