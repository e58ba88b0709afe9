//! Declarative description of a device instance.
//!
//! A [`DeviceDescriptor`] lists, for one configured accessory, every
//! characteristic it exposes (with domain, access mode, wire scaling and
//! the outbound message names), every inbound message it consumes, and the
//! derived-state rules that keep dependent characteristics consistent.
//!
//! The state engine in [`crate::state`] interprets descriptors; it contains
//! no per-class code.

mod heater_cooler;
mod light;
mod television;

pub use heater_cooler::ModeRange;

use serde::Serialize;

use crate::accessory::{AccessoryConfig, InputSource};
use crate::characteristic::{Characteristic, CharacteristicValue, RangePolicy, ValueDomain};
use crate::device_kind::DeviceKind;
use crate::error::BridgeError;
use crate::id::InstanceId;

/// How the hub may access a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Access {
    /// Readable and writable; writes are stored and forwarded.
    Stateful,
    /// Readable only; the value is driven by the controller or by rules.
    ReadOnly,
    /// Write-only trigger; forwarded but never stored.
    CommandOnly,
    /// Write-only step on another characteristic: `0` increments `target`,
    /// anything else decrements it.
    Relative { target: Characteristic },
}

impl Access {
    #[must_use]
    pub const fn readable(self) -> bool {
        matches!(self, Self::Stateful | Self::ReadOnly)
    }

    #[must_use]
    pub const fn writable(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

/// Conversion between the stored value and the integer carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Identity,
    /// Wire value is the stored value ×10, rounded.
    Tenths,
}

impl Scale {
    /// Turn a raw wire integer into a stored value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn decode(self, raw: i64) -> CharacteristicValue {
        match self {
            Self::Identity => CharacteristicValue::Int(raw),
            Self::Tenths => CharacteristicValue::Float(raw as f64 / 10.0),
        }
    }

    /// Render a stored value as wire text.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(self, value: &CharacteristicValue) -> String {
        match (self, value.as_float()) {
            (Self::Tenths, Some(f)) => ((f * 10.0).round() as i64).to_string(),
            _ => value.to_string(),
        }
    }
}

/// One characteristic exposed by a device instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicSpec {
    pub characteristic: Characteristic,
    pub domain: ValueDomain,
    pub policy: RangePolicy,
    pub access: Access,
    /// Whether the hub sees this characteristic at all.
    pub observed: bool,
    pub scale: Scale,
    /// Outbound message sent when the hub writes the characteristic.
    pub set_message: Option<&'static str>,
    /// Outbound query sent when the hub reads the characteristic.
    pub get_message: Option<&'static str>,
    /// Value before any controller report; `None` for command-only triggers.
    pub initial: Option<CharacteristicValue>,
}

impl CharacteristicSpec {
    /// A readable and writable characteristic.
    #[must_use]
    pub fn stateful(
        characteristic: Characteristic,
        domain: ValueDomain,
        initial: impl Into<CharacteristicValue>,
    ) -> Self {
        Self {
            characteristic,
            domain,
            policy: RangePolicy::Reject,
            access: Access::Stateful,
            observed: true,
            scale: Scale::Identity,
            set_message: None,
            get_message: None,
            initial: Some(initial.into()),
        }
    }

    /// A characteristic the hub can read but not write.
    #[must_use]
    pub fn read_only(
        characteristic: Characteristic,
        domain: ValueDomain,
        initial: impl Into<CharacteristicValue>,
    ) -> Self {
        Self {
            access: Access::ReadOnly,
            ..Self::stateful(characteristic, domain, initial)
        }
    }

    /// A write-only trigger with no stored value.
    #[must_use]
    pub fn command(characteristic: Characteristic, domain: ValueDomain) -> Self {
        Self {
            access: Access::CommandOnly,
            initial: None,
            ..Self::stateful(characteristic, domain, 0)
        }
    }

    /// A write-only step applied to `target`.
    #[must_use]
    pub fn relative(characteristic: Characteristic, target: Characteristic) -> Self {
        Self {
            access: Access::Relative { target },
            initial: None,
            ..Self::stateful(characteristic, ValueDomain::Int { min: 0, max: 1 }, 0)
        }
    }

    #[must_use]
    pub fn set(mut self, message: &'static str) -> Self {
        self.set_message = Some(message);
        self
    }

    #[must_use]
    pub fn get(mut self, message: &'static str) -> Self {
        self.get_message = Some(message);
        self
    }

    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.policy = RangePolicy::Clamp;
        self
    }

    #[must_use]
    pub fn tenths(mut self) -> Self {
        self.scale = Scale::Tenths;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.observed = false;
        self
    }
}

/// When an inbound message notifies the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notify {
    /// Only when the stored value actually changes.
    OnChange,
    /// On every accepted message, even if the value is unchanged.
    Always,
}

/// An inbound controller message and the characteristic it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundBinding {
    pub message: &'static str,
    pub characteristic: Characteristic,
    pub notify: Notify,
}

impl InboundBinding {
    #[must_use]
    pub const fn on_change(message: &'static str, characteristic: Characteristic) -> Self {
        Self {
            message,
            characteristic,
            notify: Notify::OnChange,
        }
    }

    #[must_use]
    pub const fn always(message: &'static str, characteristic: Characteristic) -> Self {
        Self {
            message,
            characteristic,
            notify: Notify::Always,
        }
    }
}

/// A derived-state rule, applied after a characteristic is written.
///
/// Rules fire only for the characteristic that was written directly; values
/// they derive never trigger further rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedRule {
    /// `Active = 0` forces `CurrentHeaterCoolerState = 0`;
    /// `Active = 1` sets it to `TargetHeaterCoolerState + 1`.
    CurrentFromActive,
    /// While `Active = 1`, a new `TargetHeaterCoolerState` sets
    /// `CurrentHeaterCoolerState` to `target + 1`.
    CurrentFromTarget,
    /// A non-zero `CurrentHeaterCoolerState` reported by the controller sets
    /// `TargetHeaterCoolerState` to `current - 1`, clamped to the mode range.
    /// When clamping moved the target while `Active = 1`, the current state
    /// is brought back to `target + 1`.
    TargetFromCurrent(ModeRange),
    /// Writing any member copies the value to all other members.
    Mirror(&'static [Characteristic]),
}

impl DerivedRule {
    /// Characteristics this rule may overwrite.
    #[must_use]
    pub fn writes(&self) -> &'static [Characteristic] {
        use Characteristic::{CurrentHeaterCoolerState, TargetHeaterCoolerState};

        match self {
            Self::CurrentFromActive | Self::CurrentFromTarget => &[CurrentHeaterCoolerState],
            Self::TargetFromCurrent(_) => &[TargetHeaterCoolerState, CurrentHeaterCoolerState],
            Self::Mirror(group) => group,
        }
    }
}

/// Everything the state engine needs to drive one device instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDescriptor {
    pub kind: DeviceKind,
    pub id: InstanceId,
    pub name: String,
    pub characteristics: Vec<CharacteristicSpec>,
    pub inbound: Vec<InboundBinding>,
    pub rules: Vec<DerivedRule>,
    pub inputs: Vec<InputSource>,
}

impl DeviceDescriptor {
    /// Build the descriptor for a configured accessory.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfiguration`] when the configuration
    /// cannot produce a consistent descriptor (unknown mode selection,
    /// inverted or non-finite temperature bounds, and the like).
    pub fn from_config(config: &AccessoryConfig) -> Result<Self, BridgeError> {
        match config {
            AccessoryConfig::DimLightBulb(c) => Ok(light::describe(c)),
            AccessoryConfig::HeaterCooler(c) => heater_cooler::describe(c),
            AccessoryConfig::Television(c) => television::describe(c),
        }
    }

    /// Look up the [`CharacteristicSpec`] of a characteristic this device exposes.
    #[must_use]
    pub fn spec(&self, characteristic: Characteristic) -> Option<&CharacteristicSpec> {
        self.characteristics
            .iter()
            .find(|spec| spec.characteristic == characteristic)
    }

    /// Look up the binding of an inbound message name.
    #[must_use]
    pub fn binding(&self, message: &str) -> Option<&InboundBinding> {
        self.inbound.iter().find(|b| b.message == message)
    }

    /// Distinct outbound query names, in declaration order.
    #[must_use]
    pub fn queries(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for name in self.characteristics.iter().filter_map(|s| s.get_message) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
