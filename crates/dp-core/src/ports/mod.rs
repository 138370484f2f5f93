//! Port interfaces for the application layer
//!
//! Ports define the contract between the provisioning use cases and the
//! adapters wrapping vendor SDKs and backends. Vendor version drift stays
//! behind these traits; the orchestrator only sees fixed result shapes.

pub mod activation;
mod clock;
pub mod errors;
pub mod home_backend;
mod provisioning_event;

pub use activation::{ActivationListener, ActivationPort, ActivatorCredentials};
pub use clock::*;
pub use errors::{ActivationPortError, HomeBackendError};
pub use home_backend::HomeBackendPort;
pub use provisioning_event::ProvisioningEventPort;
