//! Customer delivery address

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pricing::Coordinates;
use crate::domain::DomainResult;

/// Customer-owned delivery address. Coordinates are resolved by the
/// geocoding collaborator at creation time; an address may legitimately
/// remain ungeocoded (no result), in which case it cannot take orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    pub customer_id: String,
    pub label: String,
    pub street: String,
    pub city: String,
    pub state_code: Option<String>,
    pub postal_code: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    pub fn is_geocoded(&self) -> bool {
        self.coordinates.is_some()
    }
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn insert(&self, address: Address) -> DomainResult<Address>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Address>>;
    async fn list_for_customer(&self, customer_id: &str) -> DomainResult<Vec<Address>>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
