use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::ids::{DeviceId, HomeId};
use crate::ports::errors::ActivationPortError;
use crate::provisioning::ActivationRequest;

/// Credentials used to initialize the activation SDK.
#[derive(Clone, PartialEq, Eq)]
pub struct ActivatorCredentials {
    pub app_key: String,
    pub app_secret: String,
}

impl fmt::Debug for ActivatorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivatorCredentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

/// Receives the terminal callbacks of one activation.
///
/// Exactly one of the two is expected per activation, but implementations of
/// [`ActivationPort`] may call either any number of times from any thread.
pub trait ActivationListener: Send + Sync {
    fn on_success(&self, device_id: DeviceId, device_name: String);
    fn on_error(&self, code: String, message: String);
}

/// Vendor device-activation capability.
#[async_trait]
pub trait ActivationPort: Send + Sync {
    async fn initialize(&self, credentials: &ActivatorCredentials)
        -> Result<(), ActivationPortError>;

    /// Starts an activation. Returning `Ok` means the activation is running
    /// and will report through `listener`; `Err` means it never started.
    async fn activate(
        &self,
        request: ActivationRequest,
        home_id: HomeId,
        listener: Arc<dyn ActivationListener>,
    ) -> Result<(), ActivationPortError>;

    /// Best-effort stop of the running activation.
    async fn cancel(&self) -> Result<(), ActivationPortError>;
}
