//! FlowRequest - Validated input of one flow invocation

use std::collections::BTreeMap;

use crate::domain::errors::{FieldViolation, FlowError, ValidationErrors};
use crate::domain::value_objects::{FieldValue, MediaReference};

/// Named, validated input fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowRequest {
    fields: BTreeMap<String, FieldValue>,
}

impl FlowRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used to chain intermediate step data
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn media(&self, name: &str) -> Option<&MediaReference> {
        self.get(name).and_then(FieldValue::as_media)
    }

    /// Text of a field the input schema declared as required
    pub fn require_text(&self, name: &str) -> Result<&str, FlowError> {
        self.text(name).ok_or_else(|| missing(name))
    }

    pub fn require_number(&self, name: &str) -> Result<f64, FlowError> {
        self.number(name).ok_or_else(|| missing(name))
    }

    pub fn require_media(&self, name: &str) -> Result<&MediaReference, FlowError> {
        self.media(name).ok_or_else(|| missing(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn missing(name: &str) -> FlowError {
    let mut errors = ValidationErrors::new();
    errors.push(FieldViolation::new(name, "is required"));
    FlowError::Validation(errors)
}
