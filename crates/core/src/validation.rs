//! Boundary validation helpers.
//!
//! Request bodies derive [`validator::Validate`]; these helpers turn the
//! resulting errors into a single [`CoreError::Validation`] message.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Maximum item title length, after trimming.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum item description length, after trimming.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Run `validator` rules and collapse failures into one message.
pub fn validate_request<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(summarize(&errors)))
}

/// Join field errors as `"msg; msg"`, ordered by field name so the output is
/// stable across runs.
pub fn summarize(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut messages = Vec::new();
    for (field, errs) in &fields {
        for err in errs.iter() {
            match &err.message {
                Some(msg) => messages.push(msg.to_string()),
                None => messages.push(format!("{field} is invalid")),
            }
        }
    }
    messages.join("; ")
}

/// Fail with `"Missing required fields: a, b"` when any named field is absent
/// or blank.
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), CoreError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Trim `value` and enforce a maximum character count.
pub fn trimmed_within(field: &str, value: &str, max: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be less than {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Lowercase and trim an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
