//! Domain Errors
//!
//! Error types for flow invocations. Every error is terminal for the
//! invocation that produced it; nothing in the library retries.

use std::fmt;

use thiserror::Error;

/// Coarse classification of a [`FlowError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input, detected before any network call
    Validation,
    /// The hosted model or geocoding endpoint is unreachable or timed out
    Transport,
    /// A response arrived but does not satisfy the declared output schema
    Schema,
    /// A well-formed response that is semantically empty
    BusinessEmpty,
    /// A template references a field the request does not carry
    Template,
}

/// One offending input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every violation found in a single request, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Names of the offending fields
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Flow layer errors
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Geocoding unavailable: {0}")]
    GeocodingUnavailable(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Missing required field {0}")]
    MissingField(String),

    #[error("Transcription failed: the recording produced no text")]
    TranscriptionFailed,

    #[error("Empty result from step {step}")]
    EmptyResult { step: String },
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::Validation(_) => ErrorKind::Validation,
            FlowError::Template(_) => ErrorKind::Template,
            FlowError::ModelUnavailable(_) | FlowError::GeocodingUnavailable(_) => {
                ErrorKind::Transport
            }
            FlowError::MalformedOutput(_) | FlowError::MissingField(_) => ErrorKind::Schema,
            FlowError::TranscriptionFailed | FlowError::EmptyResult { .. } => {
                ErrorKind::BusinessEmpty
            }
        }
    }

    pub fn missing_field<T: AsRef<str>>(name: T) -> Self {
        Self::MissingField(name.as_ref().to_string())
    }

    pub fn empty_result<T: AsRef<str>>(step: T) -> Self {
        Self::EmptyResult {
            step: step.as_ref().to_string(),
        }
    }
}

impl From<ValidationErrors> for FlowError {
    fn from(errors: ValidationErrors) -> Self {
        FlowError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldViolation::new("description", "is required"));
        errors.push(FieldViolation::new("language", "must be at least 2 characters"));

        let err = FlowError::from(errors);
        let message = err.to_string();
        assert!(message.contains("description: is required"));
        assert!(message.contains("language: must be at least 2 characters"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_missing_field_message() {
        let err = FlowError::missing_field("suggestedPrice");
        assert_eq!(err.to_string(), "Missing required field suggestedPrice");
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            FlowError::ModelUnavailable("timeout".into()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(FlowError::TranscriptionFailed.kind(), ErrorKind::BusinessEmpty);
        assert_eq!(FlowError::empty_result("narrative").kind(), ErrorKind::BusinessEmpty);
    }
}
