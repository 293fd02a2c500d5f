//! Input validation.
//!
//! Every mutation input is validated before it reaches a repository:
//!
//! - **Rules**: required text, length bounds, numeric ranges, email, URL, slug
//! - **Builders**: `validate_field` chains rules on one field, `validate_request`
//!   gathers every field's errors
//! - **Errors**: field-keyed errors that convert into a `VALIDATION_ERROR`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use launchpad_core::validation::{
//!     validate_field, validate_request, MaxLength, Required, Validate, ValidationResult,
//! };
//!
//! impl Validate for CreateTopicInput {
//!     fn validate(&self) -> ValidationResult<()> {
//!         validate_request()
//!             .field(validate_field("title", &self.title).rule(Required).rule(MaxLength(200)))
//!             .field(validate_field("content", &self.content).rule(Required))
//!             .result()
//!     }
//! }
//!
//! input.validate()?;
//! ```

pub mod error;
pub mod rules;
pub mod validator;

pub use error::{FieldError, ValidationErrorKind, ValidationErrors, ValidationResult};
pub use rules::{Email, MaxItems, MaxLength, MinLength, Range, Required, Slug, Url, ValidationRule};
pub use validator::{validate_field, validate_request, FieldValidator, RequestValidator, Validate};

/// Longest allowed title or name.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Longest allowed body text.
pub const MAX_BODY_LENGTH: usize = 10_000;

/// Longest allowed short text such as a tagline or headline.
pub const MAX_SHORT_TEXT_LENGTH: usize = 300;
