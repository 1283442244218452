//! Typed option values and the two-stage cast.
//!
//! Stage one runs when a flag token (or its deferred value) is seen and only
//! answers "is there a value yet, and does it parse". Stage two runs once per
//! declared option after all tokens are consumed and produces the final value.

use serde::Serialize;
use std::fmt;

use crate::error::CastError;
use crate::option::{OptionDef, ValueKind};

/// A parsed option or argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Stage-one result: `None` means no value has been supplied yet.
pub type Staged = Option<Value>;

fn misconfigured(option: &OptionDef) -> CastError {
    CastError::Misconfigured {
        option: option.display_name(),
        kind: option.kind.clone(),
    }
}

/// Cast an inline or deferred raw value. An empty `raw` means "nothing yet".
///
/// A bare boolean flag stages `true`; it cannot take a value.
pub fn first_cast(option: &OptionDef, raw: &str) -> Result<Staged, CastError> {
    match &option.kind {
        ValueKind::Bool => {
            if raw.is_empty() {
                Ok(Some(Value::Bool(true)))
            } else {
                Err(CastError::InvalidBool {
                    value: raw.to_string(),
                })
            }
        }
        ValueKind::Unsupported(_) => Err(misconfigured(option)),
        _ if raw.is_empty() => Ok(None),
        ValueKind::String => Ok(Some(Value::Str(raw.to_string()))),
        ValueKind::Int => raw
            .parse::<i64>()
            .map(|i| Some(Value::Int(i)))
            .map_err(|_| CastError::InvalidInt {
                value: raw.to_string(),
            }),
        ValueKind::Float => raw
            .parse::<f64>()
            .map(|f| Some(Value::Float(f)))
            .map_err(|_| CastError::InvalidFloat {
                value: raw.to_string(),
            }),
    }
}

/// Produce the final value from a staged one.
///
/// Booleans resolve to `false` when never set. Other kinds must have a
/// staged value by now.
pub fn second_cast(option: &OptionDef, staged: Staged) -> Result<Value, CastError> {
    match &option.kind {
        ValueKind::Bool => Ok(Value::Bool(staged.is_some())),
        ValueKind::String | ValueKind::Int | ValueKind::Float => {
            staged.ok_or_else(|| CastError::Empty {
                kind: option.kind.clone(),
            })
        }
        ValueKind::Unsupported(_) => Err(misconfigured(option)),
    }
}
