//! Messages processed by the orchestrator's owner task.
//!
//! `Command`s come from [`ProvisioningHandle`](super::ProvisioningHandle)
//! callers; `RuntimeEvent`s come from background work (home resolution,
//! activator callbacks, timers, SDK initialization) and are the only way
//! that work reaches the session registry.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use dp_core::ids::SessionToken;
use dp_core::ports::ActivatorCredentials;
use dp_core::provisioning::{ProvisioningError, ProvisioningParams, SessionEvent};

use super::facade::{StatusReport, StopReport};
use super::orchestrator::StartReceipt;

pub(crate) enum Command {
    Initialize {
        credentials: ActivatorCredentials,
        reply: oneshot::Sender<Result<(), ProvisioningError>>,
    },
    Start {
        mode: String,
        params: ProvisioningParams,
        reply: oneshot::Sender<Result<StartReceipt, ProvisioningError>>,
    },
    Status {
        token: SessionToken,
        reply: oneshot::Sender<StatusReport>,
    },
    Stop {
        reply: oneshot::Sender<StopReport>,
    },
}

pub(crate) enum RuntimeEvent {
    Session {
        token: SessionToken,
        event: SessionEvent,
    },
    Initialized {
        result: Result<(), ProvisioningError>,
        reply: oneshot::Sender<Result<(), ProvisioningError>>,
    },
}

/// Posts runtime events back to the owner task. Usable from any thread.
#[derive(Clone)]
pub(crate) struct RuntimeEventSender {
    tx: mpsc::UnboundedSender<RuntimeEvent>,
}

impl RuntimeEventSender {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<RuntimeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn post_session(&self, token: SessionToken, event: SessionEvent) {
        if self
            .tx
            .send(RuntimeEvent::Session {
                token: token.clone(),
                event,
            })
            .is_err()
        {
            debug!(token = %token, "provisioning runtime stopped, dropping session event");
        }
    }

    pub(crate) fn post(&self, event: RuntimeEvent) {
        if self.tx.send(event).is_err() {
            debug!("provisioning runtime stopped, dropping runtime event");
        }
    }
}
