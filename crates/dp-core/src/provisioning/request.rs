//! Request parameters and the normalized activation request.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{DeviceId, HouseholdId};
use crate::provisioning::mode::{GatewayProtocol, ProvisioningMode};

/// Raw caller-supplied parameters (`map<string,string>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisioningParams(BTreeMap<String, String>);

impl ProvisioningParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`; blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Returns the first non-blank value among `keys`.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProvisioningParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Wi-Fi network credentials handed to the activator.
#[derive(Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Bluetooth onboarding path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BluetoothTarget {
    /// Through a bluetooth gateway; the mac, if given, is kept as a hint.
    Gateway {
        gateway_id: String,
        bluetooth_mac: Option<String>,
    },
    Direct {
        bluetooth_mac: String,
    },
}

/// What the activator has to do, per canonical mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationTarget {
    QuickFlash {
        wifi: WifiCredentials,
        /// Advisory bluetooth assist (hybrid mode).
        bluetooth_assist: Option<String>,
    },
    Hotspot {
        wifi: WifiCredentials,
    },
    GatewayRelayed {
        protocol: GatewayProtocol,
        gateway_id: String,
    },
    Bluetooth(BluetoothTarget),
    Manual {
        device_id: DeviceId,
    },
}

/// Household the session is provisioned for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseholdRef {
    pub id: Option<HouseholdId>,
    /// Used as the home name when a home has to be created.
    pub name: Option<String>,
}

/// Validated, normalized request produced by the mode dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    pub mode: ProvisioningMode,
    /// Mode string as the caller sent it, lowercased.
    pub requested_mode: String,
    pub target: ActivationTarget,
    pub household: HouseholdRef,
}
