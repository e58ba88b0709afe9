//! Value domains and out-of-range policies.

use serde::Serialize;

use crate::characteristic::{Characteristic, CharacteristicValue};
use crate::error::BridgeError;

/// The set of legal values for a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueDomain {
    /// Whole numbers in `min..=max`.
    Int { min: i64, max: i64 },
    /// Degrees Celsius in `min..=max`, stored with one decimal.
    Temperature { min: f64, max: f64 },
    /// Free text.
    Text,
}

/// What to do with a numeric value outside the domain bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    Reject,
    Clamp,
}

impl ValueDomain {
    /// Check `value` against this domain, returning the normalized value.
    ///
    /// Temperatures are rounded to one decimal, and with
    /// [`RangePolicy::Clamp`] out-of-range numbers saturate at the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidCharacteristicValue`] when the value has
    /// the wrong type, is not finite, or is out of range under
    /// [`RangePolicy::Reject`].
    pub fn validate(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
        policy: RangePolicy,
    ) -> Result<CharacteristicValue, BridgeError> {
        let invalid = |value: &CharacteristicValue, reason| BridgeError::InvalidCharacteristicValue {
            characteristic,
            value: value.to_string(),
            reason,
        };

        match *self {
            Self::Int { min, max } => {
                let Some(raw) = value.as_int() else {
                    return Err(invalid(&value, "expected an integer"));
                };
                if (min..=max).contains(&raw) {
                    Ok(CharacteristicValue::Int(raw))
                } else if policy == RangePolicy::Clamp {
                    Ok(CharacteristicValue::Int(raw.clamp(min, max)))
                } else {
                    Err(invalid(&value, "out of range"))
                }
            }
            Self::Temperature { min, max } => {
                let Some(raw) = value.as_float().filter(|v| v.is_finite()) else {
                    return Err(invalid(&value, "expected a number"));
                };
                let rounded = round_tenths(raw);
                if (min..=max).contains(&rounded) {
                    Ok(CharacteristicValue::Float(rounded))
                } else if policy == RangePolicy::Clamp {
                    Ok(CharacteristicValue::Float(rounded.clamp(min, max)))
                } else {
                    Err(invalid(&value, "out of range"))
                }
            }
            Self::Text => match value {
                CharacteristicValue::String(_) => Ok(value),
                other => Err(invalid(&other, "expected text")),
            },
        }
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
