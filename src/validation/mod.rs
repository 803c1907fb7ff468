//! Presence and length checks of a record against a template schema.

pub mod validator;

pub use validator::{
    InvalidField, TEMPLATE_NOT_FOUND, ValidationResult, Validator, validate_template,
};
