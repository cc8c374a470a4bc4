//! FlowResponse - Validated output of one model step

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::errors::FlowError;
use crate::domain::value_objects::FieldValue;

/// Named output fields that passed the response validator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowResponse {
    fields: BTreeMap<String, FieldValue>,
}

impl FlowResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Text of a field the schema declared as required
    pub fn required_text(&self, name: &str) -> Result<&str, FlowError> {
        self.text(name).ok_or_else(|| FlowError::missing_field(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Convert into a typed record whose serde names match the schema
    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, FlowError> {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();

        serde_json::from_value(Value::Object(map))
            .map_err(|e| FlowError::MalformedOutput(e.to_string()))
    }
}
