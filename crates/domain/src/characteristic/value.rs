//! Typed characteristic values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single characteristic value as seen by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Int(i64),
    Float(f64),
    String(String),
}

impl CharacteristicValue {
    /// The integer payload, if this is an [`Int`](Self::Int).
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The numeric payload widened to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::String(_) => None,
        }
    }

    /// The text payload, if this is a [`String`](Self::String).
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<i64> for CharacteristicValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}
