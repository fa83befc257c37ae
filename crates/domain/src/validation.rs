//! Field checks shared by entity validators.

use crate::errors::{DomainError, DomainResult};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

static CURRENCY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern compiles"));

/// Reject blank text.
pub fn require_text(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::field(field, "must not be empty"));
    }
    Ok(())
}

/// Reject text longer than `max` characters.
pub fn max_length(field: &'static str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::field(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

/// Same as [`max_length`] for optional text.
pub fn max_length_opt(field: &'static str, value: Option<&str>, max: usize) -> DomainResult<()> {
    match value {
        Some(value) => max_length(field, value, max),
        None => Ok(()),
    }
}

/// Accept only plausible e-mail addresses.
pub fn email(field: &'static str, value: &str) -> DomainResult<()> {
    if value.len() > 255 || !EMAIL_REGEX.is_match(value) {
        return Err(DomainError::field(field, "must be a valid e-mail address"));
    }
    Ok(())
}

/// Accept only ISO 4217 style three-letter codes.
pub fn currency_code(field: &'static str, value: &str) -> DomainResult<()> {
    if !CURRENCY_REGEX.is_match(value) {
        return Err(DomainError::field(
            field,
            "must be a three-letter upper-case currency code",
        ));
    }
    Ok(())
}

/// Reject negative amounts.
pub fn non_negative(field: &'static str, value: f64) -> DomainResult<()> {
    if value < 0.0 || value.is_nan() {
        return Err(DomainError::field(field, "must not be negative"));
    }
    Ok(())
}
