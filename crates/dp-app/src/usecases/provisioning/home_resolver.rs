//! Home resolver.
//!
//! Find-or-create of the home a device is activated into:
//!
//! 1. current home, if the backend has one
//! 2. otherwise the first listed home, which becomes current
//! 3. otherwise a newly created home, which becomes current
//!
//! No retries. Serialization across sessions comes from the registry's
//! single-session slot, not from locking here.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use dp_core::ids::HomeId;
use dp_core::ports::{HomeBackendError, HomeBackendPort};
use dp_core::provisioning::ProvisioningError;

#[derive(Clone)]
pub struct HomeResolver {
    backend: Arc<dyn HomeBackendPort>,
    default_home_name: String,
}

impl HomeResolver {
    pub fn new(backend: Arc<dyn HomeBackendPort>, default_home_name: impl Into<String>) -> Self {
        Self {
            backend,
            default_home_name: default_home_name.into(),
        }
    }

    pub async fn resolve(&self, requested_name: Option<&str>) -> Result<HomeId, ProvisioningError> {
        let span = info_span!("usecase.provisioning.resolve_home", requested_name = ?requested_name);
        async {
            self.resolve_inner(requested_name).await.map_err(|err| {
                warn!(error = %err, "home resolution failed");
                ProvisioningError::HomeResolutionFailed {
                    cause: err.to_string(),
                }
            })
        }
        .instrument(span)
        .await
    }

    async fn resolve_inner(&self, requested_name: Option<&str>) -> Result<HomeId, HomeBackendError> {
        if let Some(home_id) = self.backend.current_home().await? {
            debug!(home_id = %home_id, "using current home");
            return Ok(home_id);
        }

        let homes = self.backend.list_homes().await?;
        if let Some(home_id) = homes.into_iter().next() {
            self.backend.set_current_home(&home_id).await?;
            info!(home_id = %home_id, "selected first existing home");
            return Ok(home_id);
        }

        let name = requested_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_home_name.as_str());
        let home_id = self.backend.create_home(name).await?;
        self.backend.set_current_home(&home_id).await?;
        info!(home_id = %home_id, name = %name, "created home");
        Ok(home_id)
    }
}
