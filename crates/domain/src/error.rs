//! Error types shared across the workspace.
//!
//! Every layer converts into [`BridgeError`] at port boundaries. Adapters
//! keep their own typed errors and convert via `From`.

use crate::characteristic::Characteristic;
use crate::device_kind::DeviceKind;
use crate::id::InstanceId;

/// Top-level error for the synchronization core.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Wire text that could not be decoded into a [`Message`](crate::message::Message).
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] FrameError),

    /// A well-formed message for which no handler is subscribed.
    #[error("no subscriber for {device_type}:{id}:{name}")]
    UnroutedMessage {
        device_type: String,
        id: u32,
        name: String,
    },

    /// A value outside the declared domain of a characteristic.
    #[error("invalid value {value:?} for {characteristic}: {reason}")]
    InvalidCharacteristicValue {
        characteristic: Characteristic,
        value: String,
        reason: &'static str,
    },

    /// The characteristic exists but does not support the requested access
    /// (reading a command-only characteristic, writing a read-only one, or
    /// addressing a characteristic the device class does not expose).
    #[error("{characteristic} does not support {access} on {kind}")]
    UnsupportedCharacteristic {
        kind: DeviceKind,
        characteristic: Characteristic,
        access: &'static str,
    },

    /// Two handlers registered for the same `(type, id, name)` key.
    #[error("duplicate subscription for {device_type}:{id}:{name}")]
    DuplicateSubscription {
        device_type: String,
        id: u32,
        name: String,
    },

    /// Device configuration that cannot produce a valid descriptor.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Lookup of an accessory that does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: DeviceKind, id: InstanceId },
}

/// Reason a wire frame was rejected by the codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The frame does not have 4 or 5 `:`-separated fields.
    #[error("expected 4 or 5 fields, got {0}")]
    FieldCount(usize),

    /// The last field is not the `*` terminator.
    #[error("missing `*` terminator")]
    MissingTerminator,

    /// The id field is not a positive decimal integer.
    #[error("id {0:?} is not a positive integer")]
    InvalidId(String),

    /// A mandatory field is empty.
    #[error("empty {0} field")]
    EmptyField(&'static str),
}
