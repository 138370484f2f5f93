//! Provisioning configuration DTO.
//!
//! Pure data plus TOML mapping. Clamping of out-of-range values happens in
//! the application layer.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOME_NAME: &str = "My Home";
pub const DEFAULT_ACTIVATION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_COMMAND_BUFFER: usize = 64;

/// Provisioning configuration (`[provisioning]` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Name used when a home has to be created and the request carries none.
    pub default_home_name: String,

    /// Seconds to wait for an activator callback before failing the session.
    pub activation_timeout_secs: u64,

    /// Capacity of the orchestrator command queue.
    pub command_buffer: usize,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            default_home_name: DEFAULT_HOME_NAME.to_string(),
            activation_timeout_secs: DEFAULT_ACTIVATION_TIMEOUT_SECS,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl ProvisioningConfig {
    /// Create config from a TOML document; a missing `[provisioning]` table
    /// yields defaults.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        match toml_value.get("provisioning") {
            Some(section) => Ok(section.clone().try_into()?),
            None => Ok(Self::default()),
        }
    }
}
