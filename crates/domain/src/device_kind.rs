//! Device classes known to the bridge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A device class, named exactly as it appears in the `deviceType` wire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    DimLightBulb,
    HeaterCooler,
    Television,
}

impl DeviceKind {
    /// All supported classes.
    pub const ALL: [Self; 3] = [Self::DimLightBulb, Self::HeaterCooler, Self::Television];

    /// The wire name of this class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DimLightBulb => "DimLightBulb",
            Self::HeaterCooler => "HeaterCooler",
            Self::Television => "Television",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a supported device class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device type {0:?}")]
pub struct UnknownDeviceKind(pub String);

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownDeviceKind(s.to_string()))
    }
}
