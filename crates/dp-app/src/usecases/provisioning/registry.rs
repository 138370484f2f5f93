//! Session registry.
//!
//! Single source of truth for "is there an active session, and who owns its
//! completion". The registry is owned by the orchestrator task and is never
//! shared, so it needs no locking.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use dp_core::ids::{HomeId, HouseholdId, SessionToken};
use dp_core::ports::ClockPort;
use dp_core::provisioning::{
    ActivationRequest, ProvisioningError, ProvisioningMode, SessionResult, SessionState,
    SessionStatus,
};

/// Exactly-once completion handle of the start request.
pub type CompletionSender = oneshot::Sender<SessionResult>;

/// One onboarding attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningSession {
    pub token: SessionToken,
    pub mode: ProvisioningMode,
    pub requested_mode: String,
    pub household_id: Option<HouseholdId>,
    /// Set once the home resolver succeeded.
    pub home_id: Option<HomeId>,
    pub state: SessionState,
}

struct ActiveSession {
    session: ProvisioningSession,
    request: ActivationRequest,
    completion: Option<CompletionSender>,
}

pub struct SessionRegistry {
    clock: Arc<dyn ClockPort>,
    active: Option<ActiveSession>,
    last_issued_ms: i64,
    /// Token and terminal status of the most recently cleared session.
    last_finished: Option<(SessionToken, SessionStatus)>,
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            clock,
            active: None,
            last_issued_ms: i64::MIN,
            last_finished: None,
        }
    }

    /// Opens a new session in `ResolvingHome` and takes ownership of its
    /// completion. Fails with `SessionInProgress` while another session
    /// occupies the slot.
    pub fn begin_session(
        &mut self,
        request: ActivationRequest,
        completion: CompletionSender,
    ) -> Result<ProvisioningSession, ProvisioningError> {
        if let Some(active) = &self.active {
            debug!(
                token = %active.session.token,
                state = ?active.session.state,
                "rejecting start while a session is active"
            );
            return Err(ProvisioningError::SessionInProgress);
        }

        let token = self.next_token(request.mode);
        let session = ProvisioningSession {
            token,
            mode: request.mode,
            requested_mode: request.requested_mode.clone(),
            household_id: request.household.id.clone(),
            home_id: None,
            state: SessionState::ResolvingHome,
        };

        self.last_finished = None;
        self.active = Some(ActiveSession {
            session: session.clone(),
            request,
            completion: Some(completion),
        });
        Ok(session)
    }

    /// Delivers `result` to the pending completion of `token`.
    ///
    /// Returns `true` only for the first delivery; a mismatched token or an
    /// already released completion is a no-op.
    pub fn resolve(&mut self, token: &SessionToken, result: SessionResult) -> bool {
        let Some(active) = self.active_mut(token) else {
            debug!(token = %token, "resolve ignored, no matching session");
            return false;
        };
        let Some(completion) = active.completion.take() else {
            debug!(token = %token, "resolve ignored, completion already released");
            return false;
        };
        if completion.send(result).is_err() {
            // Receiver dropped; the caller stopped listening. Ownership is
            // still released.
            warn!(token = %token, "completion receiver dropped before resolution");
        }
        true
    }

    pub fn record_home(&mut self, token: &SessionToken, home_id: HomeId) -> bool {
        match self.active_mut(token) {
            Some(active) => {
                active.session.home_id = Some(home_id);
                true
            }
            None => false,
        }
    }

    pub fn set_state(&mut self, token: &SessionToken, state: SessionState) -> bool {
        match self.active_mut(token) {
            Some(active) => {
                active.session.state = state;
                true
            }
            None => false,
        }
    }

    /// Pure read. Unknown or stale tokens report `Idle`.
    pub fn current_status(&self, token: &SessionToken) -> SessionStatus {
        if let Some(session) = self.session(token) {
            return session.state.status();
        }
        match &self.last_finished {
            Some((finished, status)) if finished == token => *status,
            _ => SessionStatus::Idle,
        }
    }

    pub fn session(&self, token: &SessionToken) -> Option<&ProvisioningSession> {
        self.active
            .as_ref()
            .map(|active| &active.session)
            .filter(|session| &session.token == token)
    }

    pub fn current(&self) -> Option<&ProvisioningSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    pub fn request(&self, token: &SessionToken) -> Option<&ActivationRequest> {
        self.active
            .as_ref()
            .filter(|active| &active.session.token == token)
            .map(|active| &active.request)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Resets the slot to idle, dropping the session and any still-owned
    /// completion.
    pub fn clear(&mut self) {
        if let Some(active) = self.active.take() {
            let state = active.session.state;
            if state.is_terminal() {
                self.last_finished = Some((active.session.token, state.status()));
            }
        }
    }

    fn active_mut(&mut self, token: &SessionToken) -> Option<&mut ActiveSession> {
        self.active
            .as_mut()
            .filter(|active| &active.session.token == token)
    }

    fn next_token(&mut self, mode: ProvisioningMode) -> SessionToken {
        let now = self.clock.now_ms();
        let millis = if now > self.last_issued_ms {
            now
        } else {
            self.last_issued_ms.saturating_add(1)
        };
        self.last_issued_ms = millis;
        SessionToken::issue(mode.token_tag(), millis)
    }
}
