//! HTTP client for the external payment gateway.
//!
//! The gateway keeps the payment ledger; we only hold id references and
//! the outcomes it reports. Declined transfers are normal outcomes;
//! transport and protocol failures map to `ExternalService`.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExternalConfig;
use crate::domain::{
    ChargeIntent, DomainError, DomainResult, OrderKind, PaymentGateway, PaymentOutcome,
    TransferOutcome,
};

pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(config: &ExternalConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.gateway_timeout_ms))
            .build()
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
            api_key: config.gateway_api_key.clone(),
        })
    }
}

#[derive(Serialize)]
struct CreateIntentRequest<'a> {
    amount: Decimal,
    currency: &'a str,
    order_id: &'a str,
    order_kind: &'a str,
}

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Deserialize)]
struct PaymentResponse {
    status: String,
}

#[derive(Serialize)]
struct RefundRequest<'a> {
    payment_id: &'a str,
    amount: Decimal,
}

#[derive(Deserialize)]
struct RefundResponse {
    refunded_total: Decimal,
}

#[derive(Serialize)]
struct TransferRequest<'a> {
    destination: &'a str,
    amount: Decimal,
    currency: &'a str,
}

#[derive(Deserialize)]
struct TransferResponse {
    id: String,
    status: String,
    failure_reason: Option<String>,
}

fn transport_err(e: reqwest::Error) -> DomainError {
    DomainError::ExternalService(format!("Payment gateway: {}", e))
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_charge_intent(
        &self,
        amount: Decimal,
        currency: &str,
        order_id: &str,
        order_kind: OrderKind,
    ) -> DomainResult<ChargeIntent> {
        debug!(order_id, %amount, "Creating charge intent");
        let resp = self
            .client
            .post(format!("{}/v1/charge-intents", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CreateIntentRequest {
                amount,
                currency,
                order_id,
                order_kind: order_kind.as_str(),
            })
            .send()
            .await
            .map_err(transport_err)?
            .error_for_status()
            .map_err(transport_err)?;

        let intent: IntentResponse = resp.json().await.map_err(transport_err)?;
        Ok(ChargeIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            amount,
            currency: currency.to_string(),
        })
    }

    async fn retrieve_outcome(&self, payment_id: &str) -> DomainResult<PaymentOutcome> {
        let resp = self
            .client
            .get(format!("{}/v1/payments/{}", self.base_url, payment_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport_err)?
            .error_for_status()
            .map_err(transport_err)?;

        let payment: PaymentResponse = resp.json().await.map_err(transport_err)?;
        match payment.status.as_str() {
            "succeeded" => Ok(PaymentOutcome::Succeeded),
            "failed" => Ok(PaymentOutcome::Failed),
            other => Err(DomainError::ExternalService(format!(
                "Payment gateway returned unknown status {}",
                other
            ))),
        }
    }

    async fn refund(&self, payment_id: &str, amount: Decimal) -> DomainResult<Decimal> {
        debug!(payment_id, %amount, "Requesting refund");
        let resp = self
            .client
            .post(format!("{}/v1/refunds", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&RefundRequest { payment_id, amount })
            .send()
            .await
            .map_err(transport_err)?
            .error_for_status()
            .map_err(transport_err)?;

        let refund: RefundResponse = resp.json().await.map_err(transport_err)?;
        Ok(refund.refunded_total)
    }

    async fn transfer(
        &self,
        destination_account: &str,
        amount: Decimal,
        currency: &str,
    ) -> DomainResult<TransferOutcome> {
        debug!(destination_account, %amount, "Requesting transfer");
        let resp = self
            .client
            .post(format!("{}/v1/transfers", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&TransferRequest {
                destination: destination_account,
                amount,
                currency,
            })
            .send()
            .await
            .map_err(transport_err)?
            .error_for_status()
            .map_err(transport_err)?;

        let transfer: TransferResponse = resp.json().await.map_err(transport_err)?;
        match transfer.status.as_str() {
            "failed" => Ok(TransferOutcome::Failed {
                reason: transfer
                    .failure_reason
                    .unwrap_or_else(|| "declined".to_string()),
            }),
            _ => Ok(TransferOutcome::Succeeded {
                transfer_id: transfer.id,
            }),
        }
    }
}
