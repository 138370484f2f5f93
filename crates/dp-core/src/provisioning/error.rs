use serde::Serialize;

use crate::ids::SessionToken;

/// Provisioning error taxonomy.
///
/// `InvalidParameters`, `UnsupportedMode`, `NotInitialized` and
/// `SessionInProgress` are returned synchronously and never create a session.
/// The remaining variants terminate a session and are delivered through its
/// completion as a [`SessionFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvisioningError {
    #[error("invalid parameters: missing {}", .missing.join(", "))]
    InvalidParameters { missing: Vec<String> },

    #[error("unsupported provisioning mode: {mode}")]
    UnsupportedMode { mode: String },

    #[error("a provisioning session is already in progress")]
    SessionInProgress,

    #[error("activator not initialized, call initialize first")]
    NotInitialized,

    #[error("activator initialization failed: {cause}")]
    InitializationFailed { cause: String },

    #[error("home resolution failed: {cause}")]
    HomeResolutionFailed { cause: String },

    #[error("activation failed ({code}): {message}")]
    ActivationFailed { code: String, message: String },

    #[error("activation timed out after {timeout_secs}s")]
    ActivationTimedOut { timeout_secs: u64 },

    #[error("provisioning cancelled by user")]
    CancelledByUser,

    #[error("provisioning runtime is not running")]
    RuntimeUnavailable,
}

impl ProvisioningError {
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::InvalidParameters {
            missing: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Stable machine-readable code for facade responses.
    pub fn code(&self) -> String {
        match self {
            Self::InvalidParameters { .. } => "INVALID_PARAMETERS".into(),
            Self::UnsupportedMode { .. } => "UNSUPPORTED_MODE".into(),
            Self::SessionInProgress => "SESSION_IN_PROGRESS".into(),
            Self::NotInitialized => "NOT_INITIALIZED".into(),
            Self::InitializationFailed { .. } => "INITIALIZATION_FAILED".into(),
            Self::HomeResolutionFailed { .. } => "HOME_RESOLUTION_FAILED".into(),
            Self::ActivationFailed { code, .. } => code.clone(),
            Self::ActivationTimedOut { .. } => "ACTIVATION_TIMEOUT".into(),
            Self::CancelledByUser => "CANCELLED".into(),
            Self::RuntimeUnavailable => "RUNTIME_UNAVAILABLE".into(),
        }
    }
}

/// Asynchronous failure of a session, carrying the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("session {token}: {error}")]
pub struct SessionFailure {
    pub token: SessionToken,
    pub error: ProvisioningError,
}
