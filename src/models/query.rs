//! Query field values and the contract shared by every query type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single query field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

/// Untyped fields carried alongside the typed ones.
///
/// They skip validation but still have to pass the key map.
pub type ExtraFields = Vec<(String, FieldValue)>;

/// Contract between a typed query and the request pipeline.
pub trait Query: Clone + Default + Send + Sync {
    /// Fill every absent field from `defaults`; present fields win.
    fn merged_with(&self, defaults: &Self) -> Self;

    /// Run every present field through its validator.
    fn validated(&self) -> Result<Self, ValidationError>;

    /// Present fields in declaration order, extras last.
    fn fields(&self) -> Vec<(String, FieldValue)>;
}

/// Push `name: value` when the value is present.
pub(crate) fn push_text(out: &mut Vec<(String, FieldValue)>, name: &str, value: &Option<String>) {
    if let Some(v) = value {
        out.push((name.to_string(), FieldValue::Text(v.clone())));
    }
}

pub(crate) fn push_number(out: &mut Vec<(String, FieldValue)>, name: &str, value: Option<i64>) {
    if let Some(v) = value {
        out.push((name.to_string(), FieldValue::Number(v)));
    }
}
