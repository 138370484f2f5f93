//! # Dependency wiring
//!
//! Assembles adapters into a running provisioning orchestrator. The vendor
//! activator is always supplied by the embedding application; the home
//! backend and event sink fall back to the in-process adapters from
//! `dp-infra`.
//!
//! No business decisions are made here.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use dp_app::{ProvisioningDeps, ProvisioningHandle, ProvisioningOrchestrator};
use dp_core::config::ProvisioningConfig;
use dp_core::ports::{ActivationPort, HomeBackendPort, ProvisioningEventPort};
use dp_infra::{InMemoryHomeBackend, LoggingProvisioningEventPort, SystemClock};

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("provisioning runtime must be started inside a tokio runtime")]
    NoAsyncRuntime,
}

/// Adapters supplied by the embedding application.
pub struct WiringDeps {
    pub activation: Arc<dyn ActivationPort>,
    pub home_backend: Option<Arc<dyn HomeBackendPort>>,
    pub events: Option<Arc<dyn ProvisioningEventPort>>,
}

impl WiringDeps {
    pub fn new(activation: Arc<dyn ActivationPort>) -> Self {
        Self {
            activation,
            home_backend: None,
            events: None,
        }
    }

    pub fn with_home_backend(mut self, home_backend: Arc<dyn HomeBackendPort>) -> Self {
        self.home_backend = Some(home_backend);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn ProvisioningEventPort>) -> Self {
        self.events = Some(events);
        self
    }
}

/// A spawned orchestrator together with its owner task.
pub struct ProvisioningRuntime {
    pub handle: ProvisioningHandle,
    task: JoinHandle<()>,
}

impl ProvisioningRuntime {
    /// Stops the owner task. Pending completions resolve with
    /// `RuntimeUnavailable`.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.task.abort();
        match self.task.await {
            Ok(()) => Ok(()),
            Err(err) if err.is_cancelled() => Ok(()),
            Err(err) => Err(anyhow::anyhow!("provisioning runtime panicked: {err}")),
        }
    }
}

pub fn start_provisioning_runtime(
    config: &ProvisioningConfig,
    deps: WiringDeps,
) -> WiringResult<ProvisioningRuntime> {
    if tokio::runtime::Handle::try_current().is_err() {
        return Err(WiringError::NoAsyncRuntime);
    }

    let home_backend = deps
        .home_backend
        .unwrap_or_else(|| Arc::new(InMemoryHomeBackend::new()));
    let events = deps
        .events
        .unwrap_or_else(|| Arc::new(LoggingProvisioningEventPort));

    let (handle, task) = ProvisioningOrchestrator::spawn(
        config,
        ProvisioningDeps {
            activation: deps.activation,
            home_backend,
            clock: Arc::new(SystemClock),
            events,
        },
    );
    info!("provisioning runtime wired");
    Ok(ProvisioningRuntime { handle, task })
}
