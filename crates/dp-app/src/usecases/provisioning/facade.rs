//! Caller-facing response shapes.
//!
//! These are what a bridge to a UI or RPC layer serializes; field names are
//! camelCase on the wire.

use serde::Serialize;

use dp_core::ids::{DeviceId, HomeId, SessionToken};
use dp_core::provisioning::{ProvisioningError, ProvisioningOutcome, SessionResult, SessionStatus};

use super::orchestrator::StartReceipt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: SessionStatus,
    pub token: SessionToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopReport {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub token: SessionToken,
    pub status: SessionStatus,
    pub mode: String,
}

impl From<&StartReceipt> for StartResponse {
    fn from(receipt: &StartReceipt) -> Self {
        Self {
            token: receipt.token.clone(),
            status: receipt.status,
            mode: receipt.mode.clone(),
        }
    }
}

/// Final answer to a start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub success: bool,
    /// `success`, `provisioning`, `failed` or `cancelled`.
    pub status: String,
    pub token: SessionToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_id: Option<HomeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DeviceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&SessionResult> for CompletionResponse {
    fn from(result: &SessionResult) -> Self {
        match result {
            Ok(ProvisioningOutcome::Activated {
                token,
                home_id,
                device,
            }) => Self {
                success: true,
                status: "success".into(),
                token: token.clone(),
                home_id: Some(home_id.clone()),
                device_id: Some(device.device_id.clone()),
                device_name: Some(device.device_name.clone()),
                code: None,
                message: None,
            },
            Ok(ProvisioningOutcome::Started { token, home_id }) => Self {
                success: true,
                status: "provisioning".into(),
                token: token.clone(),
                home_id: Some(home_id.clone()),
                device_id: None,
                device_name: None,
                code: None,
                message: None,
            },
            Err(failure) => {
                let status = match failure.error {
                    ProvisioningError::CancelledByUser => "cancelled",
                    _ => "failed",
                };
                let message = match &failure.error {
                    ProvisioningError::ActivationFailed { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                Self {
                    success: false,
                    status: status.into(),
                    token: failure.token.clone(),
                    home_id: None,
                    device_id: None,
                    device_name: None,
                    code: Some(failure.error.code()),
                    message: Some(message),
                }
            }
        }
    }
}
