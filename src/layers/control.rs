//! Enumerable layer controls for UI binding.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current value of a control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Number(f32),
}

impl ControlValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            ControlValue::Bool(b) => Some(b),
            ControlValue::Number(_) => None,
        }
    }

    pub fn as_number(self) -> Option<f32> {
        match self {
            ControlValue::Number(n) => Some(n),
            ControlValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Bool(b) => write!(f, "{}", b),
            ControlValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<bool> for ControlValue {
    fn from(b: bool) -> Self {
        ControlValue::Bool(b)
    }
}

impl From<f32> for ControlValue {
    fn from(n: f32) -> Self {
        ControlValue::Number(n)
    }
}

/// A named, settable layer parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub name: &'static str,
    pub label: &'static str,
    pub value: ControlValue,
}

impl Control {
    pub fn new(name: &'static str, label: &'static str, value: impl Into<ControlValue>) -> Self {
        Self {
            name,
            label,
            value: value.into(),
        }
    }
}

/// Errors raised when setting a control.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("Layer has no control named '{0}'")]
    Unknown(String),
    #[error("Control '{name}' expects a {expected} value")]
    TypeMismatch { name: String, expected: &'static str },
    #[error("Control '{name}' needs a finite number")]
    NotFinite { name: String },
}

impl ControlError {
    pub(crate) fn expects_bool(name: &str) -> Self {
        ControlError::TypeMismatch {
            name: name.to_string(),
            expected: "boolean",
        }
    }

    pub(crate) fn expects_number(name: &str) -> Self {
        ControlError::TypeMismatch {
            name: name.to_string(),
            expected: "numeric",
        }
    }
}
