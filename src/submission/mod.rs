//! # Submissions
//!
//! Request-body decoding and validation for the `/submit` endpoint.

pub mod validator;

pub use validator::{
    parse, parse_and_validate, validate, Submission, SubmissionFields, ValidationError,
};
