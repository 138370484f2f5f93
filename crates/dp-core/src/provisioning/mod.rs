//! Provisioning domain module.
//!
//! Modes, request model, session states and the session state machine.

pub mod error;
pub mod mode;
pub mod outcome;
pub mod request;
pub mod state;
pub mod state_machine;

pub use error::{ProvisioningError, SessionFailure};
pub use mode::{CompletionPolicy, GatewayProtocol, ProvisioningMode};
pub use outcome::{ActivatedDevice, ProvisioningOutcome, SessionResult};
pub use request::{
    ActivationRequest, ActivationTarget, BluetoothTarget, HouseholdRef, ProvisioningParams,
    WifiCredentials,
};
pub use state::{SessionState, SessionStatus};
pub use state_machine::{SessionAction, SessionEvent, SessionStateMachine};
