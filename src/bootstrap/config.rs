//! Configuration loading for the process.
//!
//! The path comes from `DEVPROV_CONFIG` when set, otherwise the caller's
//! default. Parsing lives in `dp-infra`; this module only picks the file.

use std::path::{Path, PathBuf};

use dp_core::config::ProvisioningConfig;
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "DEVPROV_CONFIG";

fn resolve_config_path(default_path: &Path, env_value: Option<String>) -> PathBuf {
    env_value
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path.to_path_buf())
}

/// Loads provisioning configuration; a missing file yields defaults.
pub fn load_config(default_path: impl AsRef<Path>) -> anyhow::Result<ProvisioningConfig> {
    let path = resolve_config_path(
        default_path.as_ref(),
        std::env::var(CONFIG_PATH_ENV).ok(),
    );
    let config = dp_infra::load_provisioning_config(&path)?;
    info!(
        path = %path.display(),
        activation_timeout_secs = config.activation_timeout_secs,
        "provisioning config loaded"
    );
    Ok(config)
}
