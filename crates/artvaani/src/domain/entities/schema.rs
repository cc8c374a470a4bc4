//! Schema - Declared input and output shapes of a flow

use crate::domain::value_objects::{FieldKind, FieldValue, MediaKind};

/// Structural constraint on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Minimum length in characters, measured on the trimmed string
    MinLength(usize),
    /// Inclusive numeric range
    Range { min: f64, max: f64 },
    /// String must be one of the listed values
    OneOf(&'static [&'static str]),
}

/// One field of an input schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub constraint: Option<Constraint>,
    pub default: Option<FieldValue>,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            constraint: None,
            default: None,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn image(name: &'static str) -> Self {
        Self::new(name, FieldKind::Media(MediaKind::Image))
    }

    pub fn audio(name: &'static str) -> Self {
        Self::new(name, FieldKind::Media(MediaKind::Audio))
    }

    pub fn min_len(mut self, min: usize) -> Self {
        self.constraint = Some(Constraint::MinLength(min));
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.constraint = Some(Constraint::Range { min, max });
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.constraint = Some(Constraint::OneOf(values));
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used when the caller omits the field
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Input schema of a flow
#[derive(Debug, Clone)]
pub struct InputSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }
}

/// One field of an output schema
#[derive(Debug, Clone)]
pub struct OutputField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub one_of: Option<&'static [&'static str]>,
    /// Sent to the model alongside the schema
    pub description: &'static str,
}

impl OutputField {
    pub fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: true,
            one_of: None,
            description,
        }
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = Some(values);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Output schema the model is asked to honor
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: &'static str,
    pub fields: Vec<OutputField>,
}

impl OutputSchema {
    pub fn new(name: &'static str, fields: Vec<OutputField>) -> Self {
        Self { name, fields }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &OutputField> {
        self.fields.iter().filter(|f| f.required)
    }
}
