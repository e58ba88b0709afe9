//! Characteristics — the typed, named attributes a device exposes to the hub.
//!
//! A [`Characteristic`] names the attribute, a [`CharacteristicValue`] holds
//! its current value and a [`ValueDomain`] declares which values are legal.

mod domain;
mod value;

pub use domain::{RangePolicy, ValueDomain};
pub use value::CharacteristicValue;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every characteristic the bridge knows about, across all device classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    Brightness,
    Active,
    CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
    RotationSpeed,
    CurrentTemperature,
    TargetTemperature,
    CoolingThresholdTemperature,
    HeatingThresholdTemperature,
    TemperatureDisplayUnits,
    ActiveIdentifier,
    Mute,
    Volume,
    VolumeSelector,
    RemoteKey,
    ConfiguredName,
    SleepDiscoveryMode,
}

impl Characteristic {
    pub const ALL: [Self; 17] = [
        Self::Brightness,
        Self::Active,
        Self::CurrentHeaterCoolerState,
        Self::TargetHeaterCoolerState,
        Self::RotationSpeed,
        Self::CurrentTemperature,
        Self::TargetTemperature,
        Self::CoolingThresholdTemperature,
        Self::HeatingThresholdTemperature,
        Self::TemperatureDisplayUnits,
        Self::ActiveIdentifier,
        Self::Mute,
        Self::Volume,
        Self::VolumeSelector,
        Self::RemoteKey,
        Self::ConfiguredName,
        Self::SleepDiscoveryMode,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Active => "Active",
            Self::CurrentHeaterCoolerState => "CurrentHeaterCoolerState",
            Self::TargetHeaterCoolerState => "TargetHeaterCoolerState",
            Self::RotationSpeed => "RotationSpeed",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::TargetTemperature => "TargetTemperature",
            Self::CoolingThresholdTemperature => "CoolingThresholdTemperature",
            Self::HeatingThresholdTemperature => "HeatingThresholdTemperature",
            Self::TemperatureDisplayUnits => "TemperatureDisplayUnits",
            Self::ActiveIdentifier => "ActiveIdentifier",
            Self::Mute => "Mute",
            Self::Volume => "Volume",
            Self::VolumeSelector => "VolumeSelector",
            Self::RemoteKey => "RemoteKey",
            Self::ConfiguredName => "ConfiguredName",
            Self::SleepDiscoveryMode => "SleepDiscoveryMode",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known characteristic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown characteristic {0:?}")]
pub struct UnknownCharacteristic(pub String);

impl FromStr for Characteristic {
    type Err = UnknownCharacteristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCharacteristic(s.to_string()))
    }
}
