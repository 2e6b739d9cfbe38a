//! Driver repository trait

use async_trait::async_trait;

use super::model::{Driver, DriverLocation};
use crate::domain::DomainResult;

#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn insert(&self, driver: Driver) -> DomainResult<Driver>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Driver>>;

    async fn update(&self, driver: &Driver) -> DomainResult<()>;

    async fn list(&self, page: u64, limit: u64) -> DomainResult<(Vec<Driver>, u64)>;

    async fn set_availability(&self, driver_id: &str, available: bool) -> DomainResult<()>;

    /// Latest-wins single-row upsert of the driver's position.
    async fn upsert_location(&self, location: DriverLocation) -> DomainResult<()>;

    async fn find_location(&self, driver_id: &str) -> DomainResult<Option<DriverLocation>>;
}
