//! Device provisioning use case.
//!
//! One session at a time: a start request is validated, gets a token, resolves
//! a home and hands the device to the activator. The final outcome is
//! delivered exactly once through the [`SessionCompletion`] returned by start.

pub mod activation_bridge;
pub mod dispatcher;
pub mod facade;
pub mod home_resolver;
mod mailbox;
pub mod orchestrator;
pub mod registry;

pub use activation_bridge::ActivationBridge;
pub use dispatcher::ModeDispatcher;
pub use facade::{CompletionResponse, StartResponse, StatusReport, StopReport};
pub use home_resolver::HomeResolver;
pub use orchestrator::{
    OrchestratorSettings, ProvisioningDeps, ProvisioningHandle, ProvisioningOrchestrator,
    SessionCompletion, StartReceipt,
};
pub use registry::{ProvisioningSession, SessionRegistry};
