//! Canonical onboarding modes.

use serde::{Deserialize, Serialize};

/// Protocol spoken between a gateway and the device it relays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayProtocol {
    Zigbee,
}

/// Canonical onboarding mode.
///
/// 规范化的配网模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningMode {
    /// Wi-Fi quick flash (EZ).
    QuickFlash,
    /// Device hotspot (AP).
    Hotspot,
    /// Wi-Fi with advisory bluetooth assist; activates as quick flash.
    HybridWifiBluetooth,
    /// Relayed through an existing gateway.
    GatewayRelayed(GatewayProtocol),
    /// Direct bluetooth or bluetooth gateway.
    Bluetooth,
    /// Device already known by id, nothing to negotiate.
    Manual,
}

/// How the start request is completed once the home is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Wait for the activator success/error callback.
    AwaitActivator,
    /// Start the activator, acknowledge the request right away.
    AcknowledgeOnStart,
    /// No activator involvement, complete right after home resolution.
    Immediate,
}

impl ProvisioningMode {
    /// Maps a caller-supplied mode string (case-insensitive) to a canonical mode.
    ///
    /// `auto` defaults to quick flash.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "ez" | "wifi" | "auto" => Some(Self::QuickFlash),
            "ap" | "hotspot" => Some(Self::Hotspot),
            "wifi/bt" => Some(Self::HybridWifiBluetooth),
            "zigbee" => Some(Self::GatewayRelayed(GatewayProtocol::Zigbee)),
            "bt" => Some(Self::Bluetooth),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }

    /// Short tag used as the session token prefix.
    pub fn token_tag(&self) -> &'static str {
        match self {
            Self::QuickFlash => "ez",
            Self::Hotspot => "ap",
            Self::HybridWifiBluetooth => "wifibt",
            Self::GatewayRelayed(GatewayProtocol::Zigbee) => "zigbee",
            Self::Bluetooth => "bt",
            Self::Manual => "manual",
        }
    }

    pub fn completion_policy(&self) -> CompletionPolicy {
        match self {
            Self::QuickFlash | Self::Hotspot | Self::HybridWifiBluetooth => {
                CompletionPolicy::AwaitActivator
            }
            Self::GatewayRelayed(_) | Self::Bluetooth => CompletionPolicy::AcknowledgeOnStart,
            Self::Manual => CompletionPolicy::Immediate,
        }
    }
}
