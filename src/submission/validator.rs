//! # Submission Validator
//!
//! Turns a raw `/submit` body into a [`Submission`] or a [`ValidationError`].
//! Pure functions, no I/O.
//!
//! The payload is a JSON object with string fields `name` and `email`:
//! ```json
//! {"name": "Ada", "email": "ada@x.com"}
//! ```
//! Missing keys count as empty, extra keys are ignored, anything else that
//! does not fit that shape is malformed. The only content rule is
//! "non-empty after trimming"; email addresses are not checked for format.

use serde::Deserialize;
use thiserror::Error;

/// Client-caused rejection of a submission. Always answered with HTTP 400.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Body is not UTF-8, not JSON, or not an object of string fields.
    #[error("Invalid JSON data")]
    MalformedPayload,

    /// `name` or `email` is absent or blank.
    #[error("Name and email are required")]
    MissingField,
}

/// Wire shape of the `/submit` body, before trimming.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SubmissionFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Validated contact details: both fields trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
}

/// Decode a request body into [`SubmissionFields`].
///
/// # Returns
/// - `Ok(SubmissionFields)`: Body is a JSON object whose `name`/`email` (if present) are strings
/// - `Err(ValidationError::MalformedPayload)`: Anything else
pub fn parse(raw_body: &[u8]) -> Result<SubmissionFields, ValidationError> {
    let text = std::str::from_utf8(raw_body).map_err(|_| ValidationError::MalformedPayload)?;
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|_| ValidationError::MalformedPayload)?;

    // Derived struct deserializers also accept positional arrays
    if !value.is_object() {
        return Err(ValidationError::MalformedPayload);
    }

    serde_json::from_value(value).map_err(|_| ValidationError::MalformedPayload)
}

/// Trim both fields and require each to be non-empty.
pub fn validate(fields: SubmissionFields) -> Result<Submission, ValidationError> {
    let name = fields.name.trim();
    let email = fields.email.trim();

    if name.is_empty() || email.is_empty() {
        return Err(ValidationError::MissingField);
    }

    Ok(Submission {
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// [`parse`] followed by [`validate`].
pub fn parse_and_validate(raw_body: &[u8]) -> Result<Submission, ValidationError> {
    validate(parse(raw_body)?)
}
