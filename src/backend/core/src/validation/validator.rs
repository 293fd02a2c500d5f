//! Validator trait and field/request builders.

use crate::validation::error::{FieldError, ValidationErrors, ValidationResult};
use crate::validation::rules::ValidationRule;

/// Synchronous validation of an input object.
///
/// # Example
///
/// ```rust,ignore
/// impl Validate for CreateForumInput {
///     fn validate(&self) -> ValidationResult<()> {
///         validate_request()
///             .field(validate_field("title", &self.title).rule(Required).rule(MaxLength(200)))
///             .result()
///     }
/// }
/// ```
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A builder for validating a single field with multiple rules.
pub struct FieldValidator<'a, T> {
    field_name: &'a str,
    value: &'a T,
    errors: Vec<FieldError>,
}

impl<'a, T> FieldValidator<'a, T> {
    pub fn new(field_name: &'a str, value: &'a T) -> Self {
        Self {
            field_name,
            value,
            errors: Vec::new(),
        }
    }

    /// Apply a validation rule. Rules after the first failure are skipped.
    pub fn rule<R: ValidationRule<T>>(mut self, rule: R) -> Self {
        if !self.errors.is_empty() {
            return self;
        }

        if let Some(error) = rule.validate(self.value) {
            self.errors.push(error);
        }
        self
    }

    /// Apply a custom validation function.
    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&T) -> Option<FieldError>,
    {
        if !self.errors.is_empty() {
            return self;
        }

        if let Some(error) = f(self.value) {
            self.errors.push(error);
        }
        self
    }

    pub fn field_name(&self) -> &str {
        self.field_name
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn result(self) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();
        let field_name = self.field_name;
        for error in self.errors {
            errors.add(field_name, error);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Request Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A builder for validating entire inputs with multiple fields.
#[derive(Default)]
pub struct RequestValidator {
    errors: ValidationErrors,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a field and collect any errors.
    pub fn field<T>(mut self, validator: FieldValidator<'_, T>) -> Self {
        let field_name = validator.field_name().to_string();
        for error in validator.into_errors() {
            self.errors.add(&field_name, error);
        }
        self
    }

    /// Validate an optional field only when it is present.
    pub fn optional<'a, T, F>(self, field_name: &'a str, value: &'a Option<T>, build: F) -> Self
    where
        F: FnOnce(FieldValidator<'a, T>) -> FieldValidator<'a, T>,
    {
        match value {
            Some(inner) => self.field(build(FieldValidator::new(field_name, inner))),
            None => self,
        }
    }

    pub fn merge(mut self, other: ValidationErrors) -> Self {
        self.errors.merge(other);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn result(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Start validating a single field.
pub fn validate_field<'a, T>(field_name: &'a str, value: &'a T) -> FieldValidator<'a, T> {
    FieldValidator::new(field_name, value)
}

/// Start validating a whole input.
pub fn validate_request() -> RequestValidator {
    RequestValidator::new()
}
