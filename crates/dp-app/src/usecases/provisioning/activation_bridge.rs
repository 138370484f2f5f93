//! Activation bridge.
//!
//! Turns a normalized request into one [`ActivationPort::activate`] call and
//! feeds its callbacks back into the owner task as session events. Duplicate
//! callbacks are forwarded as-is; the registry's exactly-once resolve absorbs
//! them.
//!
//! `ActivationPort::cancel` is not scoped to a session, so a cancel issued for
//! one session must finish before the next session's `activate` runs.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use tracing::{debug, info, info_span, warn, Instrument};

use dp_core::ids::{DeviceId, HomeId, SessionToken};
use dp_core::ports::{ActivationListener, ActivationPort, ActivatorCredentials};
use dp_core::provisioning::{ActivatedDevice, ActivationRequest, ProvisioningError, SessionEvent};

use super::mailbox::RuntimeEventSender;

pub struct ActivationBridge {
    activation: Arc<dyn ActivationPort>,
    /// Most recent cancel, awaited by the next activation.
    pending_cancel: Option<JoinHandle<()>>,
}

impl ActivationBridge {
    pub fn new(activation: Arc<dyn ActivationPort>) -> Self {
        Self {
            activation,
            pending_cancel: None,
        }
    }

    /// Returns a detached initialization the caller can spawn.
    pub fn initialize(
        &self,
        credentials: ActivatorCredentials,
    ) -> impl Future<Output = Result<(), ProvisioningError>> + Send + 'static {
        let activation = Arc::clone(&self.activation);
        async move {
            activation.initialize(&credentials).await.map_err(|err| {
                warn!(error = %err, "activator initialization failed");
                ProvisioningError::InitializationFailed {
                    cause: err.to_string(),
                }
            })
        }
    }

    /// Spawns the activation; results arrive later through `events`.
    pub(crate) fn start(
        &mut self,
        token: SessionToken,
        request: ActivationRequest,
        home_id: HomeId,
        events: RuntimeEventSender,
    ) {
        let span = info_span!(
            "usecase.provisioning.activate",
            token = %token,
            mode = ?request.mode,
            home_id = %home_id
        );
        let activation = Arc::clone(&self.activation);
        let listener = Arc::new(SessionActivationListener {
            token: token.clone(),
            events: events.clone(),
        });
        let pending_cancel = self.pending_cancel.take();

        tokio::spawn(
            async move {
                if let Some(cancel) = pending_cancel {
                    debug!("waiting for previous cancel before activating");
                    let _ = cancel.await;
                }
                info!("requesting activation");
                if let Err(err) = activation.activate(request, home_id, listener).await {
                    warn!(error = %err, "activator refused request");
                    events.post_session(
                        token,
                        SessionEvent::ActivationFailed {
                            code: err.code().to_string(),
                            message: err.message(),
                        },
                    );
                }
            }
            .instrument(span),
        );
    }

    /// Best-effort stop; never awaited by the owner task, only by the next
    /// activation.
    pub(crate) fn cancel(&mut self, token: SessionToken) {
        let activation = Arc::clone(&self.activation);
        let previous = self.pending_cancel.take();
        self.pending_cancel = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            match activation.cancel().await {
                Ok(()) => debug!(token = %token, "activator cancel requested"),
                Err(err) => warn!(token = %token, error = %err, "activator cancel failed"),
            }
        }));
    }
}

struct SessionActivationListener {
    token: SessionToken,
    events: RuntimeEventSender,
}

impl ActivationListener for SessionActivationListener {
    fn on_success(&self, device_id: DeviceId, device_name: String) {
        debug!(token = %self.token, device_id = %device_id, "activator reported success");
        self.events.post_session(
            self.token.clone(),
            SessionEvent::ActivationSucceeded {
                device: ActivatedDevice {
                    device_id,
                    device_name,
                },
            },
        );
    }

    fn on_error(&self, code: String, message: String) {
        debug!(token = %self.token, code = %code, "activator reported error");
        self.events.post_session(
            self.token.clone(),
            SessionEvent::ActivationFailed { code, message },
        );
    }
}
