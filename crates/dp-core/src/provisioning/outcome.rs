use serde::{Deserialize, Serialize};

use crate::ids::{DeviceId, HomeId, SessionToken};
use crate::provisioning::error::SessionFailure;

/// Device identity reported by a successful activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedDevice {
    pub device_id: DeviceId,
    pub device_name: String,
}

impl ActivatedDevice {
    /// Identity used for manual mode, where no activator reports a name.
    pub fn manual(device_id: DeviceId) -> Self {
        let device_name = format!("Device {device_id}");
        Self {
            device_id,
            device_name,
        }
    }
}

/// Successful resolution of a start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvisioningOutcome {
    /// The device was activated into the home.
    Activated {
        token: SessionToken,
        home_id: HomeId,
        device: ActivatedDevice,
    },
    /// Provisioning was started; completion is observed by polling status.
    Started { token: SessionToken, home_id: HomeId },
}

/// What the pending completion of a start request resolves to.
pub type SessionResult = Result<ProvisioningOutcome, SessionFailure>;
