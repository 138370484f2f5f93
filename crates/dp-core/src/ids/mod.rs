//! ID type wrappers for type safety.

mod id_macro;
pub mod session_token;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

pub use session_token::SessionToken;

/// Backend-resolved identifier of a home (grouping resource).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HomeId(String);

/// Identifier of an activated device, as reported by the activator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

/// Caller-supplied opaque id of the requesting household.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseholdId(String);

impl_id!(HomeId, DeviceId, HouseholdId);
