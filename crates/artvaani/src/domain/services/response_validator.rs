//! Response Validator
//!
//! The sole correctness gate on model output: every required field must be
//! present with the declared kind. Content is not otherwise inspected.

use serde_json::Value;

use crate::domain::entities::{FlowResponse, OutputField, OutputSchema};
use crate::domain::errors::FlowError;
use crate::domain::value_objects::{FieldKind, FieldValue};

pub fn validate_response(schema: &OutputSchema, raw: &Value) -> Result<FlowResponse, FlowError> {
    let object = raw.as_object().ok_or_else(|| {
        FlowError::MalformedOutput(format!("{} output is not a JSON object", schema.name))
    })?;

    let mut response = FlowResponse::new();

    for field in &schema.fields {
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(FlowError::missing_field(field.name));
                }
            }
            Some(value) => {
                let parsed = check_kind(field, value)?;
                response.insert(field.name, parsed);
            }
        }
    }

    Ok(response)
}

fn check_kind(field: &OutputField, value: &Value) -> Result<FieldValue, FlowError> {
    let wrong_kind = || {
        FlowError::MalformedOutput(format!(
            "field {} expected {}, got {}",
            field.name,
            field.kind,
            json_kind(value)
        ))
    };

    let parsed = match field.kind {
        FieldKind::Text | FieldKind::Media(_) => {
            FieldValue::Text(value.as_str().ok_or_else(wrong_kind)?.to_string())
        }
        FieldKind::Number => FieldValue::Number(value.as_f64().ok_or_else(wrong_kind)?),
        FieldKind::Bool => FieldValue::Bool(value.as_bool().ok_or_else(wrong_kind)?),
    };

    if let (Some(allowed), FieldValue::Text(text)) = (field.one_of, &parsed) {
        if !allowed.contains(&text.as_str()) {
            return Err(FlowError::MalformedOutput(format!(
                "field {} must be one of {}, got '{}'",
                field.name,
                allowed.join("|"),
                text
            )));
        }
    }

    Ok(parsed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
