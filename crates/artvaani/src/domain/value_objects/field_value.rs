//! FieldValue - Primitive values carried by flow requests and responses

use std::fmt;

use serde_json::Value;

use super::media_reference::{MediaKind, MediaReference};

/// Primitive kind a schema field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Media(MediaKind),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "string"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Bool => write!(f, "boolean"),
            FieldKind::Media(kind) => write!(f, "{} data URI", kind),
        }
    }
}

/// A validated field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Media(MediaReference),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_media(&self) -> Option<&MediaReference> {
        match self {
            FieldValue::Media(m) => Some(m),
            _ => None,
        }
    }

    /// JSON form, used when handing values back to typed records
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Media(m) => Value::String(m.as_uri().to_string()),
        }
    }
}

/// Textual representation substituted into prompts
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Media(m) => write!(f, "[{} media]", m.content_type()),
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

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<MediaReference> for FieldValue {
    fn from(value: MediaReference) -> Self {
        FieldValue::Media(value)
    }
}
