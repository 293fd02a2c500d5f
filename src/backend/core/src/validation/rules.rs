//! Validation rules for user-supplied fields.
//!
//! Text rules apply to both `String` and `Option<String>`. An absent optional
//! value passes every rule except [`Required`].

use crate::validation::error::{FieldError, ValidationErrorKind};
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

// ═══════════════════════════════════════════════════════════════════════════════
// Pre-compiled Regex Patterns
// ═══════════════════════════════════════════════════════════════════════════════

/// Email validation regex (RFC 5322 simplified).
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("Invalid email regex")
});

/// http(s) URL with a host.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[a-zA-Z0-9](?:[a-zA-Z0-9.-]*[a-zA-Z0-9])?(?::\d{1,5})?(?:[/?#]\S*)?$")
        .expect("Invalid URL regex")
});

/// Slug validation regex (lowercase letters, numbers, hyphens).
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid slug regex")
});

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Rule Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// A validation rule that can be applied to a value.
pub trait ValidationRule<T: ?Sized> {
    /// Validate the value and return any error.
    fn validate(&self, value: &T) -> Option<FieldError>;
}

/// Values text rules can inspect.
pub trait TextValue {
    fn text(&self) -> Option<&str>;
}

impl TextValue for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl TextValue for Option<String> {
    fn text(&self) -> Option<&str> {
        self.as_deref()
    }
}

fn check_text<T: TextValue>(
    value: &T,
    ok: impl FnOnce(&str) -> bool,
    kind: impl FnOnce(&str) -> ValidationErrorKind,
) -> Option<FieldError> {
    match value.text() {
        Some(s) if !ok(s) => Some(FieldError::new(kind(s))),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Text Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Value must be present and non-blank after trimming.
#[derive(Debug, Clone)]
pub struct Required;

impl<T: TextValue> ValidationRule<T> for Required {
    fn validate(&self, value: &T) -> Option<FieldError> {
        match value.text() {
            Some(s) if !s.trim().is_empty() => None,
            _ => Some(FieldError::new(ValidationErrorKind::Required)),
        }
    }
}

/// Minimum length in characters, measured after trimming.
#[derive(Debug, Clone)]
pub struct MinLength(pub usize);

impl<T: TextValue> ValidationRule<T> for MinLength {
    fn validate(&self, value: &T) -> Option<FieldError> {
        check_text(
            value,
            |s| s.trim().chars().count() >= self.0,
            |s| ValidationErrorKind::MinLength {
                min: self.0,
                actual: s.trim().chars().count(),
            },
        )
    }
}

/// Maximum length in characters.
#[derive(Debug, Clone)]
pub struct MaxLength(pub usize);

impl<T: TextValue> ValidationRule<T> for MaxLength {
    fn validate(&self, value: &T) -> Option<FieldError> {
        check_text(
            value,
            |s| s.chars().count() <= self.0,
            |s| ValidationErrorKind::MaxLength {
                max: self.0,
                actual: s.chars().count(),
            },
        )
    }
}

#[derive(Debug, Clone)]
pub struct Email;

impl<T: TextValue> ValidationRule<T> for Email {
    fn validate(&self, value: &T) -> Option<FieldError> {
        check_text(value, |s| EMAIL_REGEX.is_match(s), |_| ValidationErrorKind::InvalidEmail)
    }
}

/// Well-formed `http` or `https` URL.
#[derive(Debug, Clone)]
pub struct Url;

impl<T: TextValue> ValidationRule<T> for Url {
    fn validate(&self, value: &T) -> Option<FieldError> {
        check_text(value, |s| URL_REGEX.is_match(s), |_| ValidationErrorKind::InvalidUrl)
    }
}

/// Lowercase kebab-case.
#[derive(Debug, Clone)]
pub struct Slug;

impl<T: TextValue> ValidationRule<T> for Slug {
    fn validate(&self, value: &T) -> Option<FieldError> {
        check_text(value, |s| SLUG_REGEX.is_match(s), |_| ValidationErrorKind::InvalidSlug)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Numeric and Collection Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Inclusive numeric range.
#[derive(Debug, Clone)]
pub struct Range<N> {
    pub min: N,
    pub max: N,
}

impl<N> Range<N> {
    pub fn new(min: N, max: N) -> Self {
        Self { min, max }
    }
}

impl<N: PartialOrd + Display> ValidationRule<N> for Range<N> {
    fn validate(&self, value: &N) -> Option<FieldError> {
        if *value < self.min || *value > self.max {
            Some(FieldError::new(ValidationErrorKind::Range {
                min: self.min.to_string(),
                max: self.max.to_string(),
                actual: value.to_string(),
            }))
        } else {
            None
        }
    }
}

/// Maximum number of items in a list.
#[derive(Debug, Clone)]
pub struct MaxItems(pub usize);

impl<T> ValidationRule<Vec<T>> for MaxItems {
    fn validate(&self, value: &Vec<T>) -> Option<FieldError> {
        if value.len() > self.0 {
            Some(FieldError::new(ValidationErrorKind::MaxItems {
                max: self.0,
                actual: value.len(),
            }))
        } else {
            None
        }
    }
}
