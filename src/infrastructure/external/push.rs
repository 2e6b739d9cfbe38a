//! HTTP push notification client

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ExternalConfig;
use crate::domain::{DomainError, DomainResult, PushSender};

pub struct HttpPushSender {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPushSender {
    pub fn new(config: &ExternalConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.push_timeout_ms))
            .build()
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.push_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Serialize)]
struct PushRequest<'a> {
    recipient_id: &'a str,
    title: &'a str,
    body: &'a str,
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, recipient_id: &str, title: &str, body: &str) -> DomainResult<()> {
        self.client
            .post(format!("{}/v1/push", self.base_url))
            .json(&PushRequest {
                recipient_id,
                title,
                body,
            })
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Push: {}", e)))?
            .error_for_status()
            .map_err(|e| DomainError::ExternalService(format!("Push: {}", e)))?;
        Ok(())
    }
}
