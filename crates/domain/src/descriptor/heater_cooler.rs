use serde::Serialize;

use crate::accessory::HeaterCoolerConfig;
use crate::characteristic::{Characteristic, ValueDomain};
use crate::descriptor::{CharacteristicSpec, DerivedRule, DeviceDescriptor, InboundBinding};
use crate::device_kind::DeviceKind;
use crate::error::BridgeError;

const DEFAULT_TEMPERATURE: f64 = 24.0;

const SETPOINTS: &[Characteristic] = &[
    Characteristic::TargetTemperature,
    Characteristic::CoolingThresholdTemperature,
    Characteristic::HeatingThresholdTemperature,
];

/// Legal `TargetHeaterCoolerState` bounds of one heater/cooler instance.
///
/// Modes are `0` auto, `1` heat, `2` cool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeRange {
    pub min: i64,
    pub max: i64,
}

impl ModeRange {
    pub const FULL: Self = Self { min: 0, max: 2 };

    /// Decode a configured mode selection code.
    ///
    /// `1..=3` pins the single mode `selection - 1`. From `10` upwards only
    /// the last digit counts: `3` → `0..=1`, `5` → `1..=2`, `6` → `0..=2`,
    /// anything else is the full range.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfiguration`] for `0` and `4..=9`.
    pub fn from_selection(selection: u8) -> Result<Self, BridgeError> {
        match selection {
            1..=3 => {
                let mode = i64::from(selection) - 1;
                Ok(Self {
                    min: mode,
                    max: mode,
                })
            }
            0 | 4..=9 => Err(BridgeError::InvalidConfiguration(format!(
                "mode selection {selection} is neither a single mode (1-3) nor a pair code (10+)"
            ))),
            _ => Ok(match selection % 10 {
                3 => Self { min: 0, max: 1 },
                5 => Self { min: 1, max: 2 },
                _ => Self::FULL,
            }),
        }
    }

    #[must_use]
    pub fn clamp(self, mode: i64) -> i64 {
        mode.clamp(self.min, self.max)
    }
}

pub(super) fn describe(config: &HeaterCoolerConfig) -> Result<DeviceDescriptor, BridgeError> {
    let modes = ModeRange::from_selection(config.mode_selection)?;
    let (min, max) = (config.min_temperature, config.max_temperature);
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(BridgeError::InvalidConfiguration(format!(
            "temperature bounds {min}..{max} are not an increasing finite range"
        )));
    }
    if !(0..=1).contains(&config.temperature_display_units) {
        return Err(BridgeError::InvalidConfiguration(format!(
            "temperature display units {} must be 0 or 1",
            config.temperature_display_units
        )));
    }

    let celsius = ValueDomain::Temperature { min, max };
    let setpoint = DEFAULT_TEMPERATURE.clamp(min, max);
    let binary = ValueDomain::Int { min: 0, max: 1 };

    Ok(DeviceDescriptor {
        kind: DeviceKind::HeaterCooler,
        id: config.id,
        name: config.name.clone(),
        characteristics: vec![
            CharacteristicSpec::stateful(Characteristic::Active, binary, 0)
                .set("setPowerState")
                .get("getPowerState"),
            CharacteristicSpec::read_only(
                Characteristic::CurrentHeaterCoolerState,
                ValueDomain::Int { min: 0, max: 3 },
                0,
            )
            .get("getCurrentHeaterCoolerState"),
            CharacteristicSpec::stateful(
                Characteristic::TargetHeaterCoolerState,
                ValueDomain::Int {
                    min: modes.min,
                    max: modes.max,
                },
                modes.min,
            )
            .set("setTargetHeaterCoolerState")
            .get("getTargetHeaterCoolerState"),
            CharacteristicSpec::stateful(
                Characteristic::RotationSpeed,
                ValueDomain::Int { min: 0, max: 100 },
                100,
            )
            .set("setRotationSpeed")
            .get("getRotationSpeed"),
            CharacteristicSpec::read_only(Characteristic::CurrentTemperature, celsius, setpoint)
                .clamped()
                .tenths()
                .get("getCurrentTemperature"),
            CharacteristicSpec::read_only(Characteristic::TargetTemperature, celsius, setpoint)
                .tenths()
                .hidden(),
            CharacteristicSpec::stateful(
                Characteristic::CoolingThresholdTemperature,
                celsius,
                setpoint,
            )
            .tenths()
            .set("setTargetTemperature")
            .get("getTargetTemperature"),
            CharacteristicSpec::stateful(
                Characteristic::HeatingThresholdTemperature,
                celsius,
                setpoint,
            )
            .tenths()
            .set("setTargetTemperature")
            .get("getTargetTemperature"),
            CharacteristicSpec::stateful(
                Characteristic::TemperatureDisplayUnits,
                binary,
                config.temperature_display_units,
            )
            .set("setTemperatureDisplayUnit")
            .get("getTemperatureDisplayUnit"),
        ],
        inbound: vec![
            InboundBinding::on_change("eventPowerState", Characteristic::Active),
            InboundBinding::on_change("getPowerState", Characteristic::Active),
            InboundBinding::on_change(
                "getCurrentHeaterCoolerState",
                Characteristic::CurrentHeaterCoolerState,
            ),
            InboundBinding::on_change(
                "eventTargetHeaterCoolerState",
                Characteristic::TargetHeaterCoolerState,
            ),
            InboundBinding::on_change(
                "getTargetHeaterCoolerState",
                Characteristic::TargetHeaterCoolerState,
            ),
            InboundBinding::on_change("eventCurrentTemperature", Characteristic::CurrentTemperature),
            InboundBinding::on_change("getCurrentTemperature", Characteristic::CurrentTemperature),
            InboundBinding::on_change("eventTargetTemperature", Characteristic::TargetTemperature),
            InboundBinding::on_change("getTargetTemperature", Characteristic::TargetTemperature),
            InboundBinding::on_change("eventRotationSpeed", Characteristic::RotationSpeed),
            InboundBinding::on_change("getRotationSpeed", Characteristic::RotationSpeed),
        ],
        rules: vec![
            DerivedRule::CurrentFromActive,
            DerivedRule::CurrentFromTarget,
            DerivedRule::TargetFromCurrent(modes),
            DerivedRule::Mirror(SETPOINTS),
        ],
        inputs: Vec::new(),
    })
}
