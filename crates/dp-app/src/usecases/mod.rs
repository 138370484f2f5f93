//! Business logic use cases
//!
//! ```text
//! start(mode, params)
//!         ↓
//! ModeDispatcher (validate / normalize, synchronous)
//!         ↓
//! SessionRegistry::begin_session
//!         ↓
//! HomeResolver (async) → ActivationBridge (async)
//!         ↓
//! SessionRegistry::resolve (exactly once)
//! ```

pub mod provisioning;
