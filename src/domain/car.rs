//! Customer-owned electric cars

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub customer_id: String,
    pub make: String,
    pub model: String,
    pub plate: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn insert(&self, car: Car) -> DomainResult<Car>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Car>>;
    async fn list_for_customer(&self, customer_id: &str) -> DomainResult<Vec<Car>>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
