use crate::ids::SessionToken;
use crate::provisioning::SessionStatus;

#[async_trait::async_trait]
pub trait ProvisioningEventPort: Send + Sync {
    async fn emit_session_status_changed(&self, token: &SessionToken, status: SessionStatus);
}
