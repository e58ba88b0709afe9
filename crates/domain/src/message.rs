//! Wire codec for the controller's colon-delimited message bus.
//!
//! Frame layout:
//!
//! ```text
//! <deviceType>:<id>:<messageName>:*           query, no value
//! <deviceType>:<id>:<messageName>:<value>:*   command or event
//! ```
//!
//! The trailing `*` is a mandatory terminator. There is no escaping, so
//! neither the name nor the value may contain `:`. The codec never
//! interprets `value`; scaling (e.g. temperatures carried ×10) belongs to
//! the state engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, FrameError};

const SEPARATOR: char = ':';
const TERMINATOR: &str = "*";

/// A single decoded wire frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub device_type: String,
    pub id: u32,
    pub name: String,
    pub value: Option<String>,
}

impl Message {
    /// Build a value-less query such as `getPowerState`.
    #[must_use]
    pub fn query(device_type: impl Into<String>, id: u32, name: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            id,
            name: name.into(),
            value: None,
        }
    }

    /// Build a frame carrying a value (outbound command or inbound event).
    #[must_use]
    pub fn command(
        device_type: impl Into<String>,
        id: u32,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            device_type: device_type.into(),
            id,
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Encode into the literal wire string, terminator included.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a single line of wire text.
    ///
    /// Leading and trailing whitespace (including `\r\n`) is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MalformedMessage`] when the field count is not
    /// 4 or 5, the terminator is not exactly `*`, the id is not an unsigned
    /// integer, or the type, name or value field is empty.
    pub fn decode(line: &str) -> Result<Self, BridgeError> {
        let fields: Vec<&str> = line.trim().split(SEPARATOR).collect();
        if fields.last() != Some(&TERMINATOR) {
            return Err(if matches!(fields.len(), 4 | 5) {
                FrameError::MissingTerminator.into()
            } else {
                FrameError::FieldCount(fields.len()).into()
            });
        }

        let (device_type, raw_id, name, value) = match fields.as_slice() {
            [device_type, id, name, _] => (*device_type, *id, *name, None),
            [device_type, id, name, value, _] => (*device_type, *id, *name, Some(*value)),
            other => return Err(FrameError::FieldCount(other.len()).into()),
        };

        if device_type.is_empty() {
            return Err(FrameError::EmptyField("deviceType").into());
        }
        if name.is_empty() {
            return Err(FrameError::EmptyField("name").into());
        }
        if value.is_some_and(str::is_empty) {
            return Err(FrameError::EmptyField("value").into());
        }
        let id = parse_id(raw_id)?;

        Ok(Self {
            device_type: device_type.to_string(),
            id,
            name: name.to_string(),
            value: value.map(str::to_string),
        })
    }

    /// Whether this message is for the given `(deviceType, id)` pair.
    #[must_use]
    pub fn targets(&self, device_type: &str, id: u32) -> bool {
        self.device_type == device_type && self.id == id
    }
}

/// Ids are positive decimal integers in canonical form, so that a decoded
/// frame re-encodes to the same text.
fn parse_id(raw: &str) -> Result<u32, FrameError> {
    let canonical = !raw.is_empty()
        && !raw.starts_with('0')
        && raw.bytes().all(|b| b.is_ascii_digit());
    canonical
        .then(|| raw.parse::<u32>().ok())
        .flatten()
        .ok_or_else(|| FrameError::InvalidId(raw.to_string()))
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:", self.device_type, self.id, self.name)?;
        if let Some(value) = &self.value {
            write!(f, "{value}:")?;
        }
        f.write_str(TERMINATOR)
    }
}

impl FromStr for Message {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
