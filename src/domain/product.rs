//! Fuel product catalog

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;

/// Fuel product. `base_price` is per liter, before the internal markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> DomainResult<Product>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Product>>;
    async fn update(&self, product: &Product) -> DomainResult<()>;
    async fn list(&self, only_available: bool) -> DomainResult<Vec<Product>>;
}
