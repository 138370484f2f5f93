use async_trait::async_trait;
use tracing::info;

use dp_core::ids::SessionToken;
use dp_core::ports::ProvisioningEventPort;
use dp_core::provisioning::SessionStatus;

/// Event port that only records status changes in the log.
///
/// Used when no UI or RPC layer subscribes to provisioning events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProvisioningEventPort;

#[async_trait]
impl ProvisioningEventPort for LoggingProvisioningEventPort {
    async fn emit_session_status_changed(&self, token: &SessionToken, status: SessionStatus) {
        info!(token = %token, status = %status, "provisioning status changed");
    }
}
