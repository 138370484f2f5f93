//! Shared fixtures for provisioning runtime tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use dp_app::usecases::provisioning::StatusReport;
use dp_app::{ProvisioningDeps, ProvisioningHandle, ProvisioningOrchestrator};
use dp_core::config::ProvisioningConfig;
use dp_core::ids::{DeviceId, HomeId, SessionToken};
use dp_core::ports::{
    ActivationListener, ActivationPort, ActivationPortError, ActivatorCredentials, ClockPort,
    HomeBackendError, HomeBackendPort, ProvisioningEventPort,
};
use dp_core::provisioning::{ActivationRequest, ProvisioningParams, SessionStatus};
use dp_infra::InMemoryHomeBackend;

/// What the activator does when `activate` is called.
#[derive(Debug, Clone)]
pub enum Script {
    Succeed { device_id: String, device_name: String },
    Fail { code: String, message: String },
    /// Keep the listener; the test fires callbacks itself.
    Hold,
    Refuse,
}

impl Script {
    pub fn succeed(device_id: &str, device_name: &str) -> Self {
        Self::Succeed {
            device_id: device_id.into(),
            device_name: device_name.into(),
        }
    }

    pub fn fail(code: &str, message: &str) -> Self {
        Self::Fail {
            code: code.into(),
            message: message.into(),
        }
    }
}

pub struct ScriptedActivator {
    script: Mutex<Script>,
    requests: Mutex<Vec<(ActivationRequest, HomeId)>>,
    listener: Mutex<Option<Arc<dyn ActivationListener>>>,
    activated: Notify,
    cancels: AtomicUsize,
    initializations: AtomicUsize,
    calls: Mutex<Vec<&'static str>>,
    hold_cancels: AtomicBool,
    cancel_gate: Semaphore,
}

impl ScriptedActivator {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
            activated: Notify::new(),
            cancels: AtomicUsize::new(0),
            initializations: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            hold_cancels: AtomicBool::new(false),
            cancel_gate: Semaphore::new(0),
        })
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }

    pub fn requests(&self) -> Vec<(ActivationRequest, HomeId)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// `activate` and `cancel` in the order they ran.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Subsequent cancels block until [`Self::release_cancels`].
    pub fn hold_cancels(&self) {
        self.hold_cancels.store(true, Ordering::SeqCst);
    }

    pub fn release_cancels(&self, n: usize) {
        self.cancel_gate.add_permits(n);
    }

    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }

    /// Resolves once `activate` has been called at least once since the
    /// last wait.
    pub async fn wait_activated(&self) {
        self.activated.notified().await;
    }

    pub fn listener(&self) -> Arc<dyn ActivationListener> {
        self.listener
            .lock()
            .unwrap()
            .clone()
            .expect("activate was not called")
    }
}

#[async_trait]
impl ActivationPort for ScriptedActivator {
    async fn initialize(
        &self,
        _credentials: &ActivatorCredentials,
    ) -> Result<(), ActivationPortError> {
        self.initializations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn activate(
        &self,
        request: ActivationRequest,
        home_id: HomeId,
        listener: Arc<dyn ActivationListener>,
    ) -> Result<(), ActivationPortError> {
        self.calls.lock().unwrap().push("activate");
        self.requests.lock().unwrap().push((request, home_id));
        *self.listener.lock().unwrap() = Some(listener.clone());
        let script = self.script.lock().unwrap().clone();
        self.activated.notify_one();

        match script {
            Script::Succeed {
                device_id,
                device_name,
            } => listener.on_success(DeviceId::from(device_id), device_name),
            Script::Fail { code, message } => listener.on_error(code, message),
            Script::Hold => {}
            Script::Refuse => {
                return Err(ActivationPortError::Rejected {
                    code: "REFUSED".into(),
                    message: "activator refused".into(),
                })
            }
        }
        Ok(())
    }

    async fn cancel(&self) -> Result<(), ActivationPortError> {
        if self.hold_cancels.load(Ordering::SeqCst) {
            self.cancel_gate.acquire().await.unwrap().forget();
        }
        self.calls.lock().unwrap().push("cancel");
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Home backend whose `list_homes` parks until released.
pub struct GatedHomeBackend {
    inner: Arc<InMemoryHomeBackend>,
    gate: Semaphore,
    entered: Notify,
}

impl GatedHomeBackend {
    pub fn new(inner: Arc<InMemoryHomeBackend>) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
            entered: Notify::new(),
        }
    }

    /// Resolves once a `list_homes` call is parked.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl HomeBackendPort for GatedHomeBackend {
    async fn current_home(&self) -> Result<Option<HomeId>, HomeBackendError> {
        self.inner.current_home().await
    }

    async fn list_homes(&self) -> Result<Vec<HomeId>, HomeBackendError> {
        self.entered.notify_one();
        self.gate
            .acquire()
            .await
            .map_err(|err| HomeBackendError::Request(err.to_string()))?
            .forget();
        self.inner.list_homes().await
    }

    async fn create_home(&self, name: &str) -> Result<HomeId, HomeBackendError> {
        self.inner.create_home(name).await
    }

    async fn set_current_home(&self, home_id: &HomeId) -> Result<(), HomeBackendError> {
        self.inner.set_current_home(home_id).await
    }
}

#[derive(Default)]
pub struct RecordingEventPort {
    events: Mutex<Vec<(SessionToken, SessionStatus)>>,
}

impl RecordingEventPort {
    pub fn events(&self) -> Vec<(SessionToken, SessionStatus)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProvisioningEventPort for RecordingEventPort {
    async fn emit_session_status_changed(&self, token: &SessionToken, status: SessionStatus) {
        self.events.lock().unwrap().push((token.clone(), status));
    }
}

/// Clock advancing one millisecond per read.
pub struct TickingClock(AtomicI64);

impl TickingClock {
    pub fn starting_at(ms: i64) -> Self {
        Self(AtomicI64::new(ms))
    }
}

impl ClockPort for TickingClock {
    fn now_ms(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

pub struct Runtime {
    pub handle: ProvisioningHandle,
    pub activator: Arc<ScriptedActivator>,
    pub homes: Arc<InMemoryHomeBackend>,
    pub events: Arc<RecordingEventPort>,
}

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn spawn_runtime(script: Script, homes: InMemoryHomeBackend) -> Runtime {
    let homes = Arc::new(homes);
    spawn_runtime_with_backend(script, homes.clone(), homes)
}

/// Runtime reading homes through `backend`; `homes` is the store behind it.
pub fn spawn_runtime_with_backend(
    script: Script,
    homes: Arc<InMemoryHomeBackend>,
    backend: Arc<dyn HomeBackendPort>,
) -> Runtime {
    init_test_tracing();
    let activator = ScriptedActivator::new(script);
    let events = Arc::new(RecordingEventPort::default());

    let deps = ProvisioningDeps {
        activation: activator.clone(),
        home_backend: backend,
        clock: Arc::new(TickingClock::starting_at(1_700_000_000_000)),
        events: events.clone(),
    };
    let (handle, _join) = ProvisioningOrchestrator::spawn(&ProvisioningConfig::default(), deps);

    Runtime {
        handle,
        activator,
        homes,
        events,
    }
}

/// Runtime whose activator has already been initialized.
pub async fn ready_runtime(script: Script) -> Runtime {
    let runtime = spawn_runtime(script, InMemoryHomeBackend::new());
    runtime
        .handle
        .initialize(credentials())
        .await
        .expect("initialize");
    runtime
}

/// Initialized runtime whose home lookups park in the returned backend.
pub async fn gated_runtime(script: Script) -> (Runtime, Arc<GatedHomeBackend>) {
    let homes = Arc::new(InMemoryHomeBackend::new());
    let gated = Arc::new(GatedHomeBackend::new(homes.clone()));
    let runtime = spawn_runtime_with_backend(script, homes, gated.clone());
    runtime
        .handle
        .initialize(credentials())
        .await
        .expect("initialize");
    (runtime, gated)
}

pub fn credentials() -> ActivatorCredentials {
    ActivatorCredentials {
        app_key: "key".into(),
        app_secret: "secret".into(),
    }
}

pub fn wifi_params() -> ProvisioningParams {
    ProvisioningParams::new()
        .with("ssid", "HomeNet")
        .with("password", "hunter22")
}

/// Polls status until it matches; every poll round-trips through the
/// runtime, so queued events are processed in between.
pub async fn wait_for_status(
    handle: &ProvisioningHandle,
    token: &SessionToken,
    expected: SessionStatus,
) -> StatusReport {
    for _ in 0..100 {
        let report = handle.status(token).await;
        if report.status == expected {
            return report;
        }
        tokio::task::yield_now().await;
    }
    panic!("session {token} never reached {expected}");
}
