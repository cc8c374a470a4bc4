//! Input Validator
//!
//! Checks every declared field structurally and reports all offending
//! fields at once. No cross-field rules.

use serde_json::{Map, Value};

use crate::domain::entities::{Constraint, FieldSpec, FlowRequest, InputSchema};
use crate::domain::errors::{FieldViolation, FlowError, ValidationErrors};
use crate::domain::value_objects::{FieldKind, FieldValue, MediaReference};

/// Validate raw caller fields against a flow's input schema
pub fn validate_input(schema: &InputSchema, raw: &Map<String, Value>) -> Result<FlowRequest, FlowError> {
    let mut request = FlowRequest::new();
    let mut errors = ValidationErrors::new();

    for spec in &schema.fields {
        match raw.get(spec.name).filter(|v| !is_absent(v)) {
            Some(value) => match check_field(spec, value) {
                Ok(field) => request.insert(spec.name, field),
                Err(reason) => errors.push(FieldViolation::new(spec.name, reason)),
            },
            None => {
                if let Some(default) = &spec.default {
                    request.insert(spec.name, default.clone());
                } else if spec.required {
                    errors.push(FieldViolation::new(spec.name, "is required"));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(request)
    } else {
        tracing::debug!(schema = schema.name, fields = ?errors.fields(), "Input rejected");
        Err(FlowError::Validation(errors))
    }
}

/// Null and blank strings count as missing
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<FieldValue, String> {
    let field = match spec.kind {
        FieldKind::Text => value
            .as_str()
            .map(|s| FieldValue::Text(s.to_string()))
            .ok_or_else(|| format!("must be a {}", spec.kind))?,
        FieldKind::Number => value
            .as_f64()
            .filter(|n| n.is_finite())
            .map(FieldValue::Number)
            .ok_or_else(|| format!("must be a {}", spec.kind))?,
        FieldKind::Bool => value
            .as_bool()
            .map(FieldValue::Bool)
            .ok_or_else(|| format!("must be a {}", spec.kind))?,
        FieldKind::Media(expected) => {
            let uri = value
                .as_str()
                .ok_or_else(|| format!("must be a {}", spec.kind))?;
            let media = MediaReference::parse(uri)?;
            if media.kind() != Some(expected) {
                return Err(format!(
                    "must be {} media, got {}",
                    expected,
                    media.content_type()
                ));
            }
            FieldValue::Media(media)
        }
    };

    if let Some(constraint) = &spec.constraint {
        check_constraint(constraint, &field)?;
    }

    Ok(field)
}

fn check_constraint(constraint: &Constraint, field: &FieldValue) -> Result<(), String> {
    match (constraint, field) {
        (Constraint::MinLength(min), FieldValue::Text(s)) => {
            if s.trim().chars().count() < *min {
                return Err(format!("must be at least {} characters", min));
            }
        }
        (Constraint::Range { min, max }, FieldValue::Number(n)) => {
            if n < min || n > max {
                return Err(format!("must be between {} and {}", min, max));
            }
        }
        (Constraint::OneOf(allowed), FieldValue::Text(s)) => {
            if !allowed.contains(&s.as_str()) {
                return Err(format!("must be one of: {}", allowed.join(", ")));
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> InputSchema {
        InputSchema::new(
            "test",
            vec![
                FieldSpec::image("photoDataUri"),
                FieldSpec::text("description").min_len(10),
                FieldSpec::text("language").min_len(2).default_value("en"),
                FieldSpec::number("latitude").range(-90.0, 90.0),
                FieldSpec::text("tone").one_of(&["warm", "formal"]).optional(),
            ],
        )
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_valid_request_applies_default() {
        let raw = object(json!({
            "photoDataUri": "data:image/png;base64,iVBORw0KGgo=",
            "description": "hand-carved wooden elephant",
            "latitude": 28.61,
        }));

        let request = validate_input(&schema(), &raw).unwrap();
        assert_eq!(request.text("language"), Some("en"));
        assert_eq!(request.number("latitude"), Some(28.61));
        assert_eq!(
            request.media("photoDataUri").map(|m| m.content_type()),
            Some("image/png")
        );
        assert!(request.get("tone").is_none());
    }

    #[test]
    fn test_reports_every_offending_field() {
        let raw = object(json!({
            "photoDataUri": "data:audio/webm;base64,GkXf",
            "description": "short",
            "latitude": 123.0,
            "tone": "sarcastic",
        }));

        let err = validate_input(&schema(), &raw).unwrap_err();
        match err {
            FlowError::Validation(errors) => {
                assert_eq!(
                    errors.fields(),
                    vec!["photoDataUri", "description", "latitude", "tone"]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_blank_fields_are_required() {
        let raw = object(json!({ "description": "   " }));

        let err = validate_input(&schema(), &raw).unwrap_err();
        let FlowError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.fields(), vec!["photoDataUri", "description", "latitude"]);
        assert!(errors
            .violations()
            .iter()
            .all(|v| v.reason == "is required"));
    }

    #[test]
    fn test_wrong_kind() {
        let raw = object(json!({
            "photoDataUri": "data:image/png;base64,iVBORw0KGgo=",
            "description": "hand-carved wooden elephant",
            "latitude": "north",
        }));

        let err = validate_input(&schema(), &raw).unwrap_err();
        let FlowError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.violations()[0].field, "latitude");
        assert_eq!(errors.violations()[0].reason, "must be a number");
    }
}
