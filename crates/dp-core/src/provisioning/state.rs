use serde::{Deserialize, Serialize};

/// Internal lifecycle state of a provisioning session.
///
/// 配网会话状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    ResolvingHome,
    Activating,
    Succeeded,
    Failed,
    Cancelled,
}

/// Caller-visible status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Provisioning,
    Succeeded,
    Failed,
    Cancelled,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Idle => SessionStatus::Idle,
            Self::ResolvingHome | Self::Activating => SessionStatus::Provisioning,
            Self::Succeeded => SessionStatus::Succeeded,
            Self::Failed => SessionStatus::Failed,
            Self::Cancelled => SessionStatus::Cancelled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Provisioning => "provisioning",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
