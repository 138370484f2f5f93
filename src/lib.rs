//! # devprov
//!
//! Device provisioning runtime: session orchestration over pluggable vendor
//! activation and home backends.
//!
//! The crates are layered like this:
//!
//! - `dp-core`: domain model, state machine and ports
//! - `dp-app`: orchestrator task and use cases
//! - `dp-infra`: adapters (clock, in-memory home backend, config loader)
//! - this crate: process bootstrap (tracing, config, wiring)

pub mod bootstrap;

pub use bootstrap::{load_config, start_provisioning_runtime, ProvisioningRuntime, WiringDeps};
pub use dp_app::{ProvisioningHandle, StartReceipt};
