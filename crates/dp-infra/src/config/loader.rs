//! Provisioning configuration loader.
//!
//! Reads and parses the TOML file only. Defaults for absent keys come from
//! the DTO; clamping happens when the orchestrator builds its settings.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use dp_core::config::ProvisioningConfig;

/// Loads `[provisioning]` from a TOML file.
///
/// A missing file yields defaults. An unreadable file or invalid TOML is an
/// error with the path in its context.
pub fn load_provisioning_config(config_path: impl AsRef<Path>) -> anyhow::Result<ProvisioningConfig> {
    let config_path = config_path.as_ref();
    if !config_path.exists() {
        debug!(path = %config_path.display(), "config file not found, using defaults");
        return Ok(ProvisioningConfig::default());
    }

    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    ProvisioningConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid [provisioning] section in {}", config_path.display()))
}
