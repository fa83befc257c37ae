//! Validation Framework
//!
//! Request types for every use case and the rules they are checked
//! against before any unit of work is opened.

mod accreditation;
mod billing;
mod facility;
mod user;

pub use accreditation::*;
pub use billing::*;
pub use facility::*;
pub use user::*;

use crate::ApplicationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("phone pattern is valid"));

/// Validation result containing all errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// Field-level errors
    pub field_errors: HashMap<String, Vec<String>>,
    /// Object-level errors
    pub object_errors: Vec<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            valid: true,
            field_errors: HashMap::new(),
            object_errors: Vec::new(),
        }
    }

    /// Create a failed validation result with a single error
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            field_errors: HashMap::new(),
            object_errors: vec![message.into()],
        }
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Add an object-level error
    pub fn add_object_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.object_errors.push(message.into());
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }

        for (field, errors) in other.field_errors {
            self.field_errors
                .entry(field)
                .or_default()
                .extend(errors);
        }

        self.object_errors.extend(other.object_errors);
    }

    /// Convert to ApplicationError if invalid
    pub fn to_error(&self) -> Option<ApplicationError> {
        if self.valid {
            return None;
        }

        let mut fields: Vec<_> = self.field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let mut messages = Vec::new();
        for (field, errors) in fields {
            for error in errors {
                messages.push(format!("{}: {}", field, error));
            }
        }

        messages.extend(self.object_errors.clone());

        Some(ApplicationError::ValidationFailed(messages.join("; ")))
    }

    /// Ensure validation passed, returning error if not
    pub fn ensure_valid(&self) -> Result<(), ApplicationError> {
        if let Some(err) = self.to_error() {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Trait for validatable types
pub trait Validatable {
    /// Validate the type and return a result
    fn validate_all(&self) -> ValidationResult;
}

/// Extension to convert validator errors to our format
pub trait ValidatorExt {
    fn to_validation_result(&self) -> ValidationResult;
}

impl<T: Validate> ValidatorExt for T {
    fn to_validation_result(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => {
                let mut result = ValidationResult::success();

                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string());
                        result.add_field_error(field.to_string(), message);
                    }
                }

                result
            }
        }
    }
}

/// Common validation rules
pub struct ValidationRules;

impl ValidationRules {
    /// Validate an email address
    pub fn validate_email(field: &str, email: &str) -> ValidationResult {
        let mut result = ValidationResult::success();

        if email.trim().is_empty() {
            result.add_field_error(field, "Email cannot be empty");
            return result;
        }

        if !validator::validate_email(email) {
            result.add_field_error(field, "Invalid email format");
        }

        if email.len() > 254 {
            result.add_field_error(field, "Email must be 254 characters or less");
        }

        result
    }

    /// Validate a phone number (digits, optional leading '+', spaces and dashes)
    pub fn validate_phone(field: &str, phone: &str) -> ValidationResult {
        let mut result = ValidationResult::success();

        if !PHONE_PATTERN.is_match(phone.trim()) {
            result.add_field_error(field, "Invalid phone number");
        }

        result
    }

    /// Validate a string length, counted in characters
    pub fn validate_length(
        value: &str,
        field: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> ValidationResult {
        let mut result = ValidationResult::success();
        let length = value.trim().chars().count();

        if let Some(min_len) = min {
            if length < min_len {
                result.add_field_error(
                    field,
                    format!("Must be at least {} characters", min_len),
                );
            }
        }

        if let Some(max_len) = max {
            if length > max_len {
                result.add_field_error(
                    field,
                    format!("Must be {} characters or less", max_len),
                );
            }
        }

        result
    }

    /// Validate an optional string's length when present
    pub fn validate_optional_length(value: Option<&str>, field: &str, max: usize) -> ValidationResult {
        value
            .map(|v| Self::validate_length(v, field, None, Some(max)))
            .unwrap_or_else(ValidationResult::success)
    }

    /// Validate that a reference key is present
    pub fn validate_key(value: &str, field: &str) -> ValidationResult {
        let mut result = ValidationResult::success();

        if value.trim().is_empty() {
            result.add_field_error(field, "Must reference an existing record");
        }

        result
    }

    /// Validate a password against the configured minimum length
    pub fn validate_password(password: &str, min_length: usize) -> ValidationResult {
        let mut result = ValidationResult::success();
        let length = password.chars().count();

        if length < min_length {
            result.add_field_error(
                "password",
                format!("Password must be at least {} characters", min_length),
            );
        }

        if length > MAX_PASSWORD_LENGTH {
            result.add_field_error(
                "password",
                format!("Password must be {} characters or less", MAX_PASSWORD_LENGTH),
            );
        }

        if !password.chars().any(|c| c.is_alphabetic()) {
            result.add_field_error("password", "Password must contain at least one letter");
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            result.add_field_error("password", "Password must contain at least one digit");
        }

        result
    }
}

/// Upper bound on accepted password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Longest name accepted for people and organisations
pub const MAX_NAME_LENGTH: usize = 100;
