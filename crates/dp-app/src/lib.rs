//! Device provisioning orchestration layer
//!
//! This crate contains the provisioning use cases and the session runtime.

pub mod usecases;

pub use usecases::provisioning::{
    ProvisioningDeps, ProvisioningHandle, ProvisioningOrchestrator, StartReceipt,
};
