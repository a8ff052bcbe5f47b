//! Request validation
//!
//! Every request payload is deserialized with optional fields and then
//! checked by its [`Validate`] impl, which yields either the validated input
//! or the full list of field errors.

use serde::{Deserialize, Serialize};
use std::fmt;

const MISSING: &str = "Missing data for required field.";

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All field errors collected while validating one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list holding a single error
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any error was recorded for `field`
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for FieldErrors {}

/// Payloads that can be turned into a checked domain input
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, FieldErrors>;
}

/// Required string, taken verbatim
pub(crate) fn required_str(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    if value.is_none() {
        errors.push(field, MISSING);
    }
    value
}

pub(crate) fn required_price(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<f64>,
) -> Option<f64> {
    match value {
        None => {
            errors.push(field, MISSING);
            None
        }
        Some(p) if !p.is_finite() => {
            errors.push(field, "Not a valid number.");
            None
        }
        Some(p) => Some(p),
    }
}

pub(crate) fn required_id(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<i64>,
) -> Option<i64> {
    if value.is_none() {
        errors.push(field, MISSING);
    }
    value
}
