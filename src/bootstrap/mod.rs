pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::load_config;
pub use wiring::{start_provisioning_runtime, ProvisioningRuntime, WiringDeps, WiringError};
