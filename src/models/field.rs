use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Input kinds the booking form knows how to validate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Number,
    Plate,
    DateTime,
}

/// Static description of one form input and its validation rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Inclusive lower bound, `number` fields only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min: Option<i64>,
    /// Inclusive upper bound, `number` fields only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<i64>,
}

impl FieldSpec {
    pub fn required(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: true,
            min: None,
            max: None,
        }
    }

    pub fn optional(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, label, kind)
        }
    }

    pub fn with_bounds(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Outcome of validating a single raw value against its [`FieldSpec`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub normalized_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn accepted(normalized_value: impl Into<String>) -> Self {
        Self {
            valid: true,
            normalized_value: normalized_value.into(),
            message: None,
        }
    }

    pub fn rejected(normalized_value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            normalized_value: normalized_value.into(),
            message: Some(message.into()),
        }
    }

    /// How the presentation layer should decorate the input.
    pub fn decoration(&self) -> FieldDecoration {
        match (&self.message, self.valid) {
            (Some(message), false) => FieldDecoration::Error(message.clone()),
            (None, false) => FieldDecoration::Error(String::new()),
            (_, true) if self.normalized_value.is_empty() => FieldDecoration::Neutral,
            (_, true) => FieldDecoration::Success,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum FieldDecoration {
    Neutral,
    Success,
    Error(String),
}

/// A rejected field, as reported back to the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
