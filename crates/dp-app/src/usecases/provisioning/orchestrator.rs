//! Provisioning session orchestrator
//!
//! Owns the session registry on a single tokio task and drives the session
//! state machine.
//!
//! # Architecture
//!
//! ```text
//! ProvisioningHandle (start / status / stop / initialize)
//!   ↓ Command
//! ProvisioningOrchestrator task ←── RuntimeEvent ── home resolver / activator / timer
//!   ↓
//! SessionStateMachine (pure transitions)
//!   ↓
//! SessionActions (executed here; async work spawned, results posted back)
//! ```
//!
//! Every registry mutation happens on the orchestrator task, so transitions
//! are serial without locks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, info_span, warn, Instrument};

use dp_core::config::ProvisioningConfig;
use dp_core::ids::SessionToken;
use dp_core::ports::{
    ActivationPort, ActivatorCredentials, ClockPort, HomeBackendPort, ProvisioningEventPort,
};
use dp_core::provisioning::{
    ActivationRequest, ProvisioningError, ProvisioningOutcome, ProvisioningParams, SessionAction,
    SessionEvent, SessionFailure, SessionResult, SessionStateMachine, SessionStatus,
};

use super::activation_bridge::ActivationBridge;
use super::dispatcher::ModeDispatcher;
use super::facade::{StatusReport, StopReport};
use super::home_resolver::HomeResolver;
use super::mailbox::{Command, RuntimeEvent, RuntimeEventSender};
use super::registry::SessionRegistry;

/// Ports the orchestrator depends on.
#[derive(Clone)]
pub struct ProvisioningDeps {
    pub activation: Arc<dyn ActivationPort>,
    pub home_backend: Arc<dyn HomeBackendPort>,
    pub clock: Arc<dyn ClockPort>,
    pub events: Arc<dyn ProvisioningEventPort>,
}

/// Runtime settings derived from [`ProvisioningConfig`], clamped to usable values.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub default_home_name: String,
    pub activation_timeout: Duration,
    pub command_buffer: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&ProvisioningConfig::default())
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &ProvisioningConfig) -> Self {
        let default_home_name = match config.default_home_name.trim() {
            "" => ProvisioningConfig::default().default_home_name,
            name => name.to_string(),
        };
        Self {
            default_home_name,
            activation_timeout: Duration::from_secs(config.activation_timeout_secs.max(1)),
            command_buffer: config.command_buffer.max(1),
        }
    }
}

/// Synchronous answer to a successful `start`.
#[derive(Debug)]
pub struct StartReceipt {
    pub token: SessionToken,
    /// Mode string as requested, lowercased.
    pub mode: String,
    pub status: SessionStatus,
    pub completion: SessionCompletion,
}

/// Pending completion of a start request; resolves exactly once.
#[derive(Debug)]
pub struct SessionCompletion {
    token: SessionToken,
    rx: oneshot::Receiver<SessionResult>,
}

impl SessionCompletion {
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Waits for the session outcome. If the runtime goes away first the
    /// session fails with `RuntimeUnavailable`.
    pub async fn wait(self) -> SessionResult {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(SessionFailure {
                token: self.token,
                error: ProvisioningError::RuntimeUnavailable,
            }),
        }
    }
}

/// Cloneable front door to a running orchestrator.
#[derive(Clone)]
pub struct ProvisioningHandle {
    command_tx: mpsc::Sender<Command>,
}

impl ProvisioningHandle {
    pub async fn initialize(
        &self,
        credentials: ActivatorCredentials,
    ) -> Result<(), ProvisioningError> {
        self.request(|reply| Command::Initialize { credentials, reply })
            .await
            .unwrap_or(Err(ProvisioningError::RuntimeUnavailable))
    }

    pub async fn start(
        &self,
        mode: impl Into<String>,
        params: ProvisioningParams,
    ) -> Result<StartReceipt, ProvisioningError> {
        let mode = mode.into();
        self.request(|reply| Command::Start {
            mode,
            params,
            reply,
        })
        .await
        .unwrap_or(Err(ProvisioningError::RuntimeUnavailable))
    }

    /// Never fails; an unknown token or a stopped runtime reports `idle`.
    pub async fn status(&self, token: &SessionToken) -> StatusReport {
        let owned = token.clone();
        self.request(|reply| Command::Status {
            token: owned,
            reply,
        })
        .await
        .unwrap_or_else(|| StatusReport {
            status: SessionStatus::Idle,
            token: token.clone(),
        })
    }

    /// Idempotent.
    pub async fn stop(&self) -> StopReport {
        self.request(|reply| Command::Stop { reply })
            .await
            .unwrap_or(StopReport { success: true })
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Option<T> {
        let (reply, rx) = oneshot::channel();
        if self.command_tx.send(build(reply)).await.is_err() {
            warn!("provisioning runtime is not running");
            return None;
        }
        rx.await.ok()
    }
}

enum Next {
    Command(Option<Command>),
    Runtime(RuntimeEvent),
}

/// Owner task of the provisioning slot.
pub struct ProvisioningOrchestrator {
    settings: OrchestratorSettings,
    registry: SessionRegistry,
    dispatcher: ModeDispatcher,
    home_resolver: HomeResolver,
    bridge: ActivationBridge,
    event_port: Arc<dyn ProvisioningEventPort>,
    initialized: bool,
    /// Home lookup of the active session; aborted when the slot clears so
    /// an abandoned lookup never reaches the backend again.
    home_resolution: Option<AbortHandle>,
    activation_timer: Option<AbortHandle>,
    command_rx: mpsc::Receiver<Command>,
    runtime_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
    runtime_tx: RuntimeEventSender,
}

impl ProvisioningOrchestrator {
    pub fn new(settings: OrchestratorSettings, deps: ProvisioningDeps) -> (Self, ProvisioningHandle) {
        let (command_tx, command_rx) = mpsc::channel(settings.command_buffer);
        let (runtime_tx, runtime_rx) = RuntimeEventSender::channel();

        let orchestrator = Self {
            registry: SessionRegistry::new(deps.clock),
            dispatcher: ModeDispatcher,
            home_resolver: HomeResolver::new(deps.home_backend, settings.default_home_name.clone()),
            bridge: ActivationBridge::new(deps.activation),
            event_port: deps.events,
            initialized: false,
            home_resolution: None,
            activation_timer: None,
            command_rx,
            runtime_rx,
            runtime_tx,
            settings,
        };

        (orchestrator, ProvisioningHandle { command_tx })
    }

    /// Spawns the owner task on the current tokio runtime.
    pub fn spawn(
        config: &ProvisioningConfig,
        deps: ProvisioningDeps,
    ) -> (ProvisioningHandle, JoinHandle<()>) {
        let (orchestrator, handle) = Self::new(OrchestratorSettings::from_config(config), deps);
        let join = tokio::spawn(orchestrator.run());
        (handle, join)
    }

    /// Runs until every [`ProvisioningHandle`] is dropped.
    pub async fn run(mut self) {
        info!(
            activation_timeout_secs = self.settings.activation_timeout.as_secs(),
            "provisioning runtime started"
        );
        loop {
            let next = tokio::select! {
                command = self.command_rx.recv() => Next::Command(command),
                Some(event) = self.runtime_rx.recv() => Next::Runtime(event),
            };
            match next {
                Next::Command(Some(command)) => self.handle_command(command).await,
                Next::Command(None) => break,
                Next::Runtime(event) => self.handle_runtime_event(event).await,
            }
        }
        self.abort_home_resolution();
        self.cancel_activation_timer();
        info!("provisioning runtime stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Initialize { credentials, reply } => self.initialize(credentials, reply),
            Command::Start {
                mode,
                params,
                reply,
            } => {
                let result = self.start(&mode, &params).await;
                if reply.send(result).is_err() {
                    debug!("start caller went away before reply");
                }
            }
            Command::Status { token, reply } => {
                let status = self.registry.current_status(&token);
                let _ = reply.send(StatusReport { status, token });
            }
            Command::Stop { reply } => {
                self.stop().await;
                let _ = reply.send(StopReport { success: true });
            }
        }
    }

    async fn handle_runtime_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Session { token, event } => {
                self.handle_session_event(token, event).await
            }
            RuntimeEvent::Initialized { result, reply } => {
                if result.is_ok() {
                    self.initialized = true;
                    info!("activator initialized");
                }
                let _ = reply.send(result);
            }
        }
    }

    fn initialize(
        &mut self,
        credentials: ActivatorCredentials,
        reply: oneshot::Sender<Result<(), ProvisioningError>>,
    ) {
        let mut missing = Vec::new();
        if credentials.app_key.trim().is_empty() {
            missing.push("appKey");
        }
        if credentials.app_secret.trim().is_empty() {
            missing.push("appSecret");
        }
        if !missing.is_empty() {
            let _ = reply.send(Err(ProvisioningError::missing(missing)));
            return;
        }

        let initialize = self.bridge.initialize(credentials);
        let events = self.runtime_tx.clone();
        tokio::spawn(async move {
            let result = initialize.await;
            events.post(RuntimeEvent::Initialized { result, reply });
        });
    }

    async fn start(
        &mut self,
        mode: &str,
        params: &ProvisioningParams,
    ) -> Result<StartReceipt, ProvisioningError> {
        let request = self.dispatcher.dispatch(mode, params).map_err(|err| {
            info!(mode = %mode, error = %err, "provisioning request rejected");
            err
        })?;
        if !self.initialized {
            return Err(ProvisioningError::NotInitialized);
        }

        let (completion_tx, completion_rx) = oneshot::channel();
        let session = self.registry.begin_session(request.clone(), completion_tx)?;
        let token = session.token.clone();
        info!(
            token = %token,
            mode = ?session.mode,
            household_id = ?session.household_id,
            "provisioning session started"
        );

        self.emit(&token, SessionStatus::Provisioning).await;
        self.spawn_home_resolution(token.clone(), request.household.name.clone());

        Ok(StartReceipt {
            completion: SessionCompletion {
                token: token.clone(),
                rx: completion_rx,
            },
            token,
            mode: session.requested_mode,
            status: SessionStatus::Provisioning,
        })
    }

    async fn stop(&mut self) {
        let Some(session) = self.registry.current() else {
            debug!("stop requested with no active session");
            return;
        };
        let token = session.token.clone();
        info!(token = %token, "provisioning stop requested");
        self.handle_session_event(token, SessionEvent::StopRequested)
            .await;
    }

    fn spawn_home_resolution(&mut self, token: SessionToken, requested_name: Option<String>) {
        self.abort_home_resolution();
        let resolver = self.home_resolver.clone();
        let events = self.runtime_tx.clone();
        let span = info_span!("usecase.provisioning.session", token = %token);
        let handle = tokio::spawn(
            async move {
                let event = match resolver.resolve(requested_name.as_deref()).await {
                    Ok(home_id) => SessionEvent::HomeResolved { home_id },
                    Err(ProvisioningError::HomeResolutionFailed { cause }) => {
                        SessionEvent::HomeResolutionFailed { cause }
                    }
                    Err(other) => SessionEvent::HomeResolutionFailed {
                        cause: other.to_string(),
                    },
                };
                events.post_session(token, event);
            }
            .instrument(span),
        );
        self.home_resolution = Some(handle.abort_handle());
    }

    fn abort_home_resolution(&mut self) {
        if let Some(handle) = self.home_resolution.take() {
            handle.abort();
        }
    }

    async fn handle_session_event(&mut self, token: SessionToken, event: SessionEvent) {
        let (from, request) = match (self.registry.session(&token), self.registry.request(&token)) {
            (Some(session), Some(request)) => (session.state, request.clone()),
            _ => {
                debug!(token = %token, ?event, "session event for inactive session ignored");
                return;
            }
        };

        if let SessionEvent::HomeResolved { home_id } = &event {
            if !from.is_terminal() {
                self.registry.record_home(&token, home_id.clone());
            }
        }

        let event_name = format!("{:?}", event);
        let (next, actions) = SessionStateMachine::transition(&request, from, event);
        info!(
            token = %token,
            from = ?from,
            to = ?next,
            event = %event_name,
            "provisioning session transition"
        );
        self.registry.set_state(&token, next);
        if next != from {
            self.emit(&token, next.status()).await;
        }

        self.execute_actions(&token, &request, actions);
    }

    fn execute_actions(
        &mut self,
        token: &SessionToken,
        request: &ActivationRequest,
        actions: Vec<SessionAction>,
    ) {
        for action in actions {
            debug!(token = %token, ?action, "provisioning executing action");
            match action {
                SessionAction::StartActivation { home_id } => {
                    self.bridge.start(
                        token.clone(),
                        request.clone(),
                        home_id,
                        self.runtime_tx.clone(),
                    );
                }
                SessionAction::ScheduleTimeout => self.schedule_activation_timer(token.clone()),
                SessionAction::AcknowledgeStarted { home_id } => {
                    let outcome = ProvisioningOutcome::Started {
                        token: token.clone(),
                        home_id,
                    };
                    self.resolve(token, Ok(outcome));
                }
                SessionAction::CompleteSucceeded { device } => {
                    let home_id = self
                        .registry
                        .session(token)
                        .and_then(|session| session.home_id.clone());
                    let result = match home_id {
                        Some(home_id) => Ok(ProvisioningOutcome::Activated {
                            token: token.clone(),
                            home_id,
                            device,
                        }),
                        None => {
                            error!(token = %token, "session succeeded without a resolved home");
                            Err(SessionFailure {
                                token: token.clone(),
                                error: ProvisioningError::HomeResolutionFailed {
                                    cause: "home was never resolved".into(),
                                },
                            })
                        }
                    };
                    self.resolve(token, result);
                }
                SessionAction::CompleteFailed { error } => {
                    warn!(token = %token, error = %error, "provisioning session failed");
                    self.resolve(
                        token,
                        Err(SessionFailure {
                            token: token.clone(),
                            error,
                        }),
                    );
                }
                SessionAction::CancelActivator => self.bridge.cancel(token.clone()),
                SessionAction::ClearSession => {
                    self.abort_home_resolution();
                    self.cancel_activation_timer();
                    self.registry.clear();
                }
            }
        }
    }

    fn resolve(&mut self, token: &SessionToken, result: SessionResult) {
        if !self.registry.resolve(token, result) {
            debug!(token = %token, "completion already released");
        }
    }

    fn schedule_activation_timer(&mut self, token: SessionToken) {
        self.cancel_activation_timer();
        let timeout = self.settings.activation_timeout;
        let events = self.runtime_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            events.post_session(
                token,
                SessionEvent::ActivationTimedOut {
                    timeout_secs: timeout.as_secs(),
                },
            );
        });
        self.activation_timer = Some(handle.abort_handle());
    }

    fn cancel_activation_timer(&mut self) {
        if let Some(handle) = self.activation_timer.take() {
            handle.abort();
        }
    }

    async fn emit(&self, token: &SessionToken, status: SessionStatus) {
        self.event_port
            .emit_session_status_changed(token, status)
            .await;
    }
}
