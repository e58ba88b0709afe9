//! Accessory configuration — the hub-provided context a device instance is
//! built from.
//!
//! Each `[[accessories]]` table in the daemon config deserializes into one
//! [`AccessoryConfig`], tagged by its `type` field:
//!
//! ```toml
//! [[accessories]]
//! type = "HeaterCooler"
//! id = 12
//! name = "Living Room AC"
//! mode_selection = 13
//! ```

use serde::{Deserialize, Serialize};

use crate::device_kind::DeviceKind;
use crate::id::InstanceId;

/// Configuration of one accessory instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccessoryConfig {
    DimLightBulb(LightConfig),
    HeaterCooler(HeaterCoolerConfig),
    Television(TelevisionConfig),
}

impl AccessoryConfig {
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::DimLightBulb(_) => DeviceKind::DimLightBulb,
            Self::HeaterCooler(_) => DeviceKind::HeaterCooler,
            Self::Television(_) => DeviceKind::Television,
        }
    }

    #[must_use]
    pub fn id(&self) -> InstanceId {
        match self {
            Self::DimLightBulb(c) => c.id,
            Self::HeaterCooler(c) => c.id,
            Self::Television(c) => c.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::DimLightBulb(c) => &c.name,
            Self::HeaterCooler(c) => &c.name,
            Self::Television(c) => &c.name,
        }
    }
}

/// A dimmable light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub id: InstanceId,
    pub name: String,
}

/// A single-setpoint heater/cooler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterCoolerConfig {
    pub id: InstanceId,
    pub name: String,
    /// Mode code: `1..=3` pins a single mode, `>= 10` selects a pair by
    /// its last digit (see [`ModeRange`](crate::descriptor::ModeRange)).
    #[serde(default = "default_mode_selection")]
    pub mode_selection: u8,
    /// Lowest settable temperature, in degrees Celsius.
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,
    /// Highest settable temperature, in degrees Celsius.
    #[serde(default = "default_max_temperature")]
    pub max_temperature: f64,
    /// Initial display unit (0 = Celsius, 1 = Fahrenheit).
    #[serde(default)]
    pub temperature_display_units: i64,
}

/// A television-class media player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelevisionConfig {
    pub id: InstanceId,
    pub name: String,
    /// Static input list; an input's position is its `ActiveIdentifier`.
    #[serde(default)]
    pub inputs: Vec<InputSource>,
}

/// One selectable input of a television.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSource {
    pub name: String,
    /// Hub input source type code (HDMI, tuner, application, …).
    #[serde(rename = "type", default)]
    pub input_type: u8,
}

fn default_mode_selection() -> u8 {
    10
}

fn default_min_temperature() -> f64 {
    10.0
}

fn default_max_temperature() -> f64 {
    38.0
}
