//! HTTP geocoding client (Nominatim-style search API).
//!
//! The request aborts after the configured timeout so a slow provider
//! cannot stall address creation. "No result" is a legitimate answer
//! and comes back as `Ok(None)`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ExternalConfig;
use crate::domain::pricing::Coordinates;
use crate::domain::{DomainError, DomainResult, Geocoder};

pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    pub fn new(config: &ExternalConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.geocoder_timeout_ms))
            .user_agent("petrotap-service")
            .build()
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.geocoder_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str) -> DomainResult<Option<Coordinates>> {
        debug!(query, "Geocoding address");
        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Geocoder: {}", e)))?
            .error_for_status()
            .map_err(|e| DomainError::ExternalService(format!("Geocoder: {}", e)))?;

        let results: Vec<SearchResult> = resp
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Geocoder: {}", e)))?;

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };
        let lat: f64 = first.lat.parse().map_err(|_| {
            DomainError::ExternalService(format!("Geocoder returned bad latitude {}", first.lat))
        })?;
        let lon: f64 = first.lon.parse().map_err(|_| {
            DomainError::ExternalService(format!("Geocoder returned bad longitude {}", first.lon))
        })?;
        Ok(Some(Coordinates { lat, lon }))
    }
}
