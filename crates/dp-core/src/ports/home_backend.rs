use async_trait::async_trait;

use crate::ids::HomeId;
use crate::ports::errors::HomeBackendError;

/// Home (grouping resource) backend.
#[async_trait]
pub trait HomeBackendPort: Send + Sync {
    async fn current_home(&self) -> Result<Option<HomeId>, HomeBackendError>;

    /// Existing homes, in backend order.
    async fn list_homes(&self) -> Result<Vec<HomeId>, HomeBackendError>;

    async fn create_home(&self, name: &str) -> Result<HomeId, HomeBackendError>;

    async fn set_current_home(&self, home_id: &HomeId) -> Result<(), HomeBackendError>;
}
