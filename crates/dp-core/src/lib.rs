//! # dp-core
//!
//! Core domain models and ports for device provisioning sessions.
//!
//! This crate contains pure provisioning logic without any infrastructure
//! dependencies.

pub mod config;
pub mod ids;
pub mod ports;
pub mod provisioning;

// Re-export commonly used types at the crate root
pub use config::ProvisioningConfig;
pub use ids::{DeviceId, HomeId, HouseholdId, SessionToken};
pub use provisioning::{
    ActivatedDevice, ActivationRequest, ProvisioningError, ProvisioningMode, ProvisioningOutcome,
    ProvisioningParams, SessionFailure, SessionResult, SessionState, SessionStatus,
};
