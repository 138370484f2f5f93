//! Mode dispatcher.
//!
//! Maps the caller's mode string to a canonical mode and validates the
//! parameters it needs before any asynchronous work begins.

use dp_core::ids::{DeviceId, HouseholdId};
use dp_core::provisioning::{
    ActivationRequest, ActivationTarget, BluetoothTarget, GatewayProtocol, HouseholdRef,
    ProvisioningError, ProvisioningMode, ProvisioningParams, WifiCredentials,
};

pub const PARAM_SSID: &str = "ssid";
pub const PARAM_PASSWORD: &str = "password";
pub const PARAM_GATEWAY_ID: &str = "gatewayId";
pub const PARAM_BLUETOOTH_MAC: &str = "bluetoothMac";
pub const PARAM_DEVICE_ID: &str = "deviceId";
pub const PARAM_HOUSEHOLD_ID: &str = "householdId";
pub const PARAM_HOUSEHOLD_NAME: &str = "householdName";

/// Legacy key accepted in place of `gatewayId` for zigbee.
const PARAM_ZIGBEE_GATEWAY_ID: &str = "zigbeeGatewayId";
/// Legacy key accepted in place of `gatewayId` for bluetooth.
const PARAM_BT_GATEWAY_ID: &str = "btGatewayId";

#[derive(Debug, Default, Clone, Copy)]
pub struct ModeDispatcher;

impl ModeDispatcher {
    pub fn dispatch(
        &self,
        mode: &str,
        params: &ProvisioningParams,
    ) -> Result<ActivationRequest, ProvisioningError> {
        let requested_mode = mode.trim().to_ascii_lowercase();
        let canonical =
            ProvisioningMode::parse(&requested_mode).ok_or_else(|| ProvisioningError::UnsupportedMode {
                mode: mode.to_string(),
            })?;

        let target = match canonical {
            ProvisioningMode::QuickFlash => ActivationTarget::QuickFlash {
                wifi: wifi_credentials(params)?,
                bluetooth_assist: None,
            },
            ProvisioningMode::Hotspot => ActivationTarget::Hotspot {
                wifi: wifi_credentials(params)?,
            },
            ProvisioningMode::HybridWifiBluetooth => ActivationTarget::QuickFlash {
                wifi: wifi_credentials(params)?,
                bluetooth_assist: params.get(PARAM_BLUETOOTH_MAC).map(str::to_string),
            },
            ProvisioningMode::GatewayRelayed(protocol) => {
                let gateway_id = params
                    .get_any(&[PARAM_GATEWAY_ID, gateway_alias(protocol)])
                    .ok_or_else(|| ProvisioningError::missing([PARAM_GATEWAY_ID]))?;
                ActivationTarget::GatewayRelayed {
                    protocol,
                    gateway_id: gateway_id.to_string(),
                }
            }
            ProvisioningMode::Bluetooth => ActivationTarget::Bluetooth(bluetooth_target(params)?),
            ProvisioningMode::Manual => {
                let device_id = params
                    .get(PARAM_DEVICE_ID)
                    .ok_or_else(|| ProvisioningError::missing([PARAM_DEVICE_ID]))?;
                ActivationTarget::Manual {
                    device_id: DeviceId::from(device_id),
                }
            }
        };

        Ok(ActivationRequest {
            mode: canonical,
            requested_mode,
            target,
            household: HouseholdRef {
                id: params.get(PARAM_HOUSEHOLD_ID).map(HouseholdId::from),
                name: params.get(PARAM_HOUSEHOLD_NAME).map(str::to_string),
            },
        })
    }
}

fn wifi_credentials(params: &ProvisioningParams) -> Result<WifiCredentials, ProvisioningError> {
    match (params.get(PARAM_SSID), params.get(PARAM_PASSWORD)) {
        (Some(ssid), Some(password)) => Ok(WifiCredentials {
            ssid: ssid.to_string(),
            password: password.to_string(),
        }),
        (ssid, password) => {
            let mut missing = Vec::new();
            if ssid.is_none() {
                missing.push(PARAM_SSID);
            }
            if password.is_none() {
                missing.push(PARAM_PASSWORD);
            }
            Err(ProvisioningError::missing(missing))
        }
    }
}

fn gateway_alias(protocol: GatewayProtocol) -> &'static str {
    match protocol {
        GatewayProtocol::Zigbee => PARAM_ZIGBEE_GATEWAY_ID,
    }
}

/// A given gateway id always wins over a direct MAC. Whether the gateway is
/// reachable is left to the activator, which reports failure through its
/// error callback.
fn bluetooth_target(params: &ProvisioningParams) -> Result<BluetoothTarget, ProvisioningError> {
    let gateway_id = params.get_any(&[PARAM_GATEWAY_ID, PARAM_BT_GATEWAY_ID]);
    let bluetooth_mac = params.get(PARAM_BLUETOOTH_MAC).map(str::to_string);

    match (gateway_id, bluetooth_mac) {
        (Some(gateway_id), bluetooth_mac) => Ok(BluetoothTarget::Gateway {
            gateway_id: gateway_id.to_string(),
            bluetooth_mac,
        }),
        (None, Some(bluetooth_mac)) => Ok(BluetoothTarget::Direct { bluetooth_mac }),
        (None, None) => Err(ProvisioningError::missing([
            PARAM_BLUETOOTH_MAC,
            PARAM_GATEWAY_ID,
        ])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ProvisioningParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn dispatch_quick_flash_aliases_share_one_canonical_mode() {
        let p = params(&[("ssid", "Home"), ("password", "secret1")]);
        for alias in ["ez", "wifi", "auto", "EZ"] {
            let request = ModeDispatcher.dispatch(alias, &p).unwrap();
            assert_eq!(request.mode, ProvisioningMode::QuickFlash);
            assert_eq!(request.requested_mode, alias.to_ascii_lowercase());
        }
    }

    #[test]
    fn dispatch_unknown_mode_fails_with_unsupported_mode() {
        let err = ModeDispatcher
            .dispatch("bogus", &ProvisioningParams::new())
            .unwrap_err();
        assert_eq!(
            err,
            ProvisioningError::UnsupportedMode {
                mode: "bogus".into()
            }
        );
    }

    #[test]
    fn dispatch_hotspot_without_password_names_missing_field() {
        let err = ModeDispatcher
            .dispatch("ap", &params(&[("ssid", "X")]))
            .unwrap_err();
        assert_eq!(err, ProvisioningError::missing(["password"]));
    }

    #[test]
    fn dispatch_wifi_without_credentials_names_both_fields() {
        let err = ModeDispatcher
            .dispatch("wifi", &ProvisioningParams::new())
            .unwrap_err();
        assert_eq!(err, ProvisioningError::missing(["ssid", "password"]));
    }

    #[test]
    fn dispatch_hybrid_routes_to_quick_flash_with_bluetooth_assist() {
        let p = params(&[
            ("ssid", "Home"),
            ("password", "secret1"),
            ("bluetoothMac", "AA:BB"),
        ]);
        let request = ModeDispatcher.dispatch("wifi/bt", &p).unwrap();
        assert_eq!(request.mode, ProvisioningMode::HybridWifiBluetooth);
        assert!(matches!(
            request.target,
            ActivationTarget::QuickFlash {
                bluetooth_assist: Some(ref mac),
                ..
            } if mac == "AA:BB"
        ));
    }

    #[test]
    fn dispatch_zigbee_requires_gateway_and_accepts_legacy_key() {
        let err = ModeDispatcher
            .dispatch("zigbee", &ProvisioningParams::new())
            .unwrap_err();
        assert_eq!(err, ProvisioningError::missing(["gatewayId"]));

        let request = ModeDispatcher
            .dispatch("zigbee", &params(&[("zigbeeGatewayId", "gw-9")]))
            .unwrap();
        assert_eq!(
            request.target,
            ActivationTarget::GatewayRelayed {
                protocol: GatewayProtocol::Zigbee,
                gateway_id: "gw-9".into(),
            }
        );
    }

    #[test]
    fn dispatch_bluetooth_prefers_gateway_when_both_given() {
        let p = params(&[("bluetoothMac", "AA:BB"), ("gatewayId", "gw-1")]);
        let request = ModeDispatcher.dispatch("bt", &p).unwrap();
        assert_eq!(
            request.target,
            ActivationTarget::Bluetooth(BluetoothTarget::Gateway {
                gateway_id: "gw-1".into(),
                bluetooth_mac: Some("AA:BB".into()),
            })
        );
    }

    #[test]
    fn dispatch_bluetooth_direct_and_missing() {
        let request = ModeDispatcher
            .dispatch("bt", &params(&[("bluetoothMac", "AA:BB")]))
            .unwrap();
        assert_eq!(
            request.target,
            ActivationTarget::Bluetooth(BluetoothTarget::Direct {
                bluetooth_mac: "AA:BB".into()
            })
        );

        let err = ModeDispatcher
            .dispatch("bt", &params(&[("gatewayId", " ")]))
            .unwrap_err();
        assert_eq!(err, ProvisioningError::missing(["bluetoothMac", "gatewayId"]));
    }

    #[test]
    fn dispatch_manual_requires_device_id_and_carries_household() {
        let err = ModeDispatcher
            .dispatch("manual", &ProvisioningParams::new())
            .unwrap_err();
        assert_eq!(err, ProvisioningError::missing(["deviceId"]));

        let p = params(&[
            ("deviceId", "dev42"),
            ("householdId", "hh-7"),
            ("householdName", "Lab"),
        ]);
        let request = ModeDispatcher.dispatch("manual", &p).unwrap();
        assert_eq!(
            request.target,
            ActivationTarget::Manual {
                device_id: DeviceId::from("dev42")
            }
        );
        assert_eq!(request.household.id, Some(HouseholdId::from("hh-7")));
        assert_eq!(request.household.name.as_deref(), Some("Lab"));
    }
}
