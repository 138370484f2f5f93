//! Provisioning session state machine.
//!
//! Defines a pure state transition function for one provisioning session.
//! Side effects are returned as [`SessionAction`]s and executed by the
//! orchestrator.

use crate::ids::HomeId;
use crate::provisioning::error::ProvisioningError;
use crate::provisioning::mode::CompletionPolicy;
use crate::provisioning::outcome::ActivatedDevice;
use crate::provisioning::request::{ActivationRequest, ActivationTarget};
use crate::provisioning::state::SessionState;

/// Events that drive a session after it was begun.
///
/// 驱动配网会话的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Home resolver found or created a home.
    HomeResolved { home_id: HomeId },
    /// Home resolver failed.
    HomeResolutionFailed { cause: String },
    /// Activator success callback.
    ActivationSucceeded { device: ActivatedDevice },
    /// Activator error callback, or the activator refused the request.
    ActivationFailed { code: String, message: String },
    /// No activator callback within the configured timeout.
    ActivationTimedOut { timeout_secs: u64 },
    /// Caller stopped the session.
    StopRequested,
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Invoke the activator for the resolved home.
    StartActivation { home_id: HomeId },
    /// Arm the activation timeout.
    ScheduleTimeout,
    /// Resolve the pending completion with a "provisioning started" acknowledgment.
    AcknowledgeStarted { home_id: HomeId },
    /// Resolve the pending completion with success.
    CompleteSucceeded { device: ActivatedDevice },
    /// Resolve the pending completion with an error.
    CompleteFailed { error: ProvisioningError },
    /// Ask the activator to stop (best effort).
    CancelActivator,
    /// Release the provisioning slot.
    ClearSession,
}

/// Pure session state machine.
///
/// 纯状态机：不包含副作用。
pub struct SessionStateMachine;

impl SessionStateMachine {
    pub fn transition(
        request: &ActivationRequest,
        state: SessionState,
        event: SessionEvent,
    ) -> (SessionState, Vec<SessionAction>) {
        match (state, event) {
            (SessionState::ResolvingHome, SessionEvent::HomeResolved { home_id }) => {
                match request.mode.completion_policy() {
                    CompletionPolicy::AwaitActivator => (
                        SessionState::Activating,
                        vec![
                            SessionAction::StartActivation { home_id },
                            SessionAction::ScheduleTimeout,
                        ],
                    ),
                    CompletionPolicy::AcknowledgeOnStart => (
                        SessionState::Activating,
                        vec![
                            SessionAction::StartActivation {
                                home_id: home_id.clone(),
                            },
                            SessionAction::ScheduleTimeout,
                            SessionAction::AcknowledgeStarted { home_id },
                        ],
                    ),
                    CompletionPolicy::Immediate => match manual_device(request) {
                        Some(device) => (
                            SessionState::Succeeded,
                            vec![
                                SessionAction::CompleteSucceeded { device },
                                SessionAction::ClearSession,
                            ],
                        ),
                        None => Self::fail(ProvisioningError::missing(["deviceId"])),
                    },
                }
            }
            (SessionState::ResolvingHome, SessionEvent::HomeResolutionFailed { cause }) => {
                Self::fail(ProvisioningError::HomeResolutionFailed { cause })
            }
            (SessionState::Activating, SessionEvent::ActivationSucceeded { device }) => (
                SessionState::Succeeded,
                vec![
                    SessionAction::CompleteSucceeded { device },
                    SessionAction::ClearSession,
                ],
            ),
            (SessionState::Activating, SessionEvent::ActivationFailed { code, message }) => {
                Self::fail(ProvisioningError::ActivationFailed { code, message })
            }
            (SessionState::Activating, SessionEvent::ActivationTimedOut { timeout_secs }) => (
                SessionState::Failed,
                vec![
                    SessionAction::CancelActivator,
                    SessionAction::CompleteFailed {
                        error: ProvisioningError::ActivationTimedOut { timeout_secs },
                    },
                    SessionAction::ClearSession,
                ],
            ),
            (SessionState::ResolvingHome, SessionEvent::StopRequested) => (
                SessionState::Cancelled,
                vec![
                    SessionAction::CompleteFailed {
                        error: ProvisioningError::CancelledByUser,
                    },
                    SessionAction::ClearSession,
                ],
            ),
            (SessionState::Activating, SessionEvent::StopRequested) => (
                SessionState::Cancelled,
                vec![
                    SessionAction::CancelActivator,
                    SessionAction::CompleteFailed {
                        error: ProvisioningError::CancelledByUser,
                    },
                    SessionAction::ClearSession,
                ],
            ),
            (state, _event) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(?state, ?_event, "session event ignored in current state");
                (state, Vec::new())
            }
        }
    }

    fn fail(error: ProvisioningError) -> (SessionState, Vec<SessionAction>) {
        (
            SessionState::Failed,
            vec![
                SessionAction::CompleteFailed { error },
                SessionAction::ClearSession,
            ],
        )
    }
}

fn manual_device(request: &ActivationRequest) -> Option<ActivatedDevice> {
    match &request.target {
        ActivationTarget::Manual { device_id } => Some(ActivatedDevice::manual(device_id.clone())),
        _ => None,
    }
}
