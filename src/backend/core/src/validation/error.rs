//! Validation error types with field-level error support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ErrorCode, LaunchpadError};

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Error Types
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of validation error that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Field is required but was missing or blank.
    Required,
    /// String length is below the minimum.
    MinLength { min: usize, actual: usize },
    /// String length exceeds the maximum.
    MaxLength { max: usize, actual: usize },
    /// Value must be within a range.
    Range { min: String, max: String, actual: String },
    /// Value does not match the expected email format.
    InvalidEmail,
    /// Value is not an http(s) URL.
    InvalidUrl,
    /// Value is not a lowercase kebab-case slug.
    InvalidSlug,
    /// Collection has too many items.
    MaxItems { max: usize, actual: usize },
    /// Custom validation failed.
    Custom { code: String },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "field is required"),
            Self::MinLength { min, actual } => {
                write!(f, "must be at least {} characters (got {})", min, actual)
            }
            Self::MaxLength { max, actual } => {
                write!(f, "must be at most {} characters (got {})", max, actual)
            }
            Self::Range { min, max, actual } => {
                write!(f, "must be between {} and {} (got {})", min, max, actual)
            }
            Self::InvalidEmail => write!(f, "must be a valid email address"),
            Self::InvalidUrl => write!(f, "must be a valid http(s) URL"),
            Self::InvalidSlug => write!(f, "must be lowercase words separated by hyphens"),
            Self::MaxItems { max, actual } => {
                write!(f, "must have at most {} items (got {})", max, actual)
            }
            Self::Custom { code } => write!(f, "validation failed: {}", code),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Error
// ═══════════════════════════════════════════════════════════════════════════════

/// A single validation error for a specific field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ValidationErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    pub fn with_message(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Errors Collection
// ═══════════════════════════════════════════════════════════════════════════════

/// Validation errors keyed by field name, in field order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of errors across all fields.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.entry(field.into()).or_default().push(error);
    }

    pub fn get(&self, field: &str) -> Option<&Vec<FieldError>> {
        self.errors.get(field)
    }

    pub fn has_errors(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<FieldError>)> {
        self.errors.iter()
    }

    /// `field: message` lines, one per error.
    pub fn to_flat_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(field, errors)| errors.iter().map(move |e| format!("{}: {}", field, e)))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_flat_messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

impl From<ValidationErrors> for LaunchpadError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: BTreeMap<String, Vec<String>> = errors
            .iter()
            .map(|(field, errs)| (field.clone(), errs.iter().map(|e| e.message.clone()).collect()))
            .collect();

        LaunchpadError::new(ErrorCode::ValidationError, errors.to_string())
            .with_context("fields", fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", FieldError::new(ValidationErrorKind::Required));
        errors.add(
            "title",
            FieldError::new(ValidationErrorKind::MinLength { min: 3, actual: 0 }),
        );
        errors.add("rating", FieldError::new(ValidationErrorKind::Range {
            min: "1".into(),
            max: "5".into(),
            actual: "9".into(),
        }));

        assert_eq!(errors.error_count(), 3);
        assert!(errors.has_errors("title"));
        assert_eq!(errors.get("title").unwrap().len(), 2);
        assert_eq!(
            errors.to_flat_messages()[0],
            "rating: must be between 1 and 5 (got 9)"
        );
    }

    #[test]
    fn test_converts_to_validation_error() {
        let mut errors = ValidationErrors::new();
        errors.add("content", FieldError::new(ValidationErrorKind::Required));

        let error = LaunchpadError::from(errors);
        assert_eq!(error.code(), ErrorCode::ValidationError);
        assert!(error.user_message().contains("content: field is required"));
        assert!(error.details().context.contains_key("fields"));
    }
}
