//! Error types for the AccrediGo domain.

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A single field failed validation
    #[error("Field validation failed: {field} - {message}")]
    InvalidField {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Two fields are inconsistent with each other
    #[error("Invalid range: {start} must not be after {end}")]
    InvalidRange {
        /// Field holding the lower bound
        start: &'static str,
        /// Field holding the upper bound
        end: &'static str,
    },

    /// Stored text does not name a known enumeration variant
    #[error("Unknown {kind} value: '{value}'")]
    UnknownVariant {
        /// Enumeration name
        kind: &'static str,
        /// Rejected text
        value: String,
    },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidField`].
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::UnknownVariant { .. } => "UNKNOWN_VARIANT",
        }
    }
}

/// Result alias for domain checks.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomainError::field("email", "must be a valid e-mail address");
        assert_eq!(
            err.to_string(),
            "Field validation failed: email - must be a valid e-mail address"
        );
        assert_eq!(err.error_code(), "INVALID_FIELD");

        let err = DomainError::InvalidRange {
            start: "trial_start",
            end: "trial_end",
        };
        assert!(err.to_string().contains("trial_start"));
    }
}
