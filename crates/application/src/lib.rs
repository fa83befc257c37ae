//! Application layer for AccrediGo
//!
//! This crate turns requests into unit-of-work operations against the
//! repositories and maps the resulting entities to transfer objects.
//!
//! ## Modules
//!
//! - `context` - The current request (caller identity, client address, language)
//! - `audit` - Population of audit fields on incoming commands
//! - `mapping` - Compile-time entity to DTO mapping registry
//! - `services` - One service per feature area (users, facilities, billing, ...)
//! - `validation` - Request types and their validation rules
//! - `dto` - Transfer objects and response envelopes

pub mod audit;
pub mod context;
pub mod dto;
pub mod mapping;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use audit::{AuditService, AuditStamp, Auditable};
pub use context::RequestContext;
pub use dto::{ApiResponse, PaginatedResponse, ResponseState};
pub use mapping::{MapFrom, MapInto, MappingPair, MappingRegistry};
pub use services::{
    AccreditationService, ExploreUserService, FacilityService, FacilityUserService, ServiceConfig,
    SubscriptionPlanService, UserService,
};
pub use validation::{Validatable, ValidationResult, ValidationRules};

use accredigo_domain::DomainError;
use accredigo_infrastructure::Error as InfrastructureError;
use thiserror::Error;
use tracing::error;

/// Application-level errors
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Resource conflict (e.g., duplicate)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database unreachable or pool exhausted
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl ApplicationError {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ApplicationError::NotFound(_) => 404,
            ApplicationError::Unauthorized(_) => 401,
            ApplicationError::Forbidden(_) => 403,
            ApplicationError::InvalidInput(_) => 400,
            ApplicationError::ValidationFailed(_) => 422,
            ApplicationError::Conflict(_) => 409,
            ApplicationError::Internal(_) => 500,
            ApplicationError::ServiceUnavailable(_) => 503,
            ApplicationError::Timeout(_) => 504,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::ServiceUnavailable(_) | ApplicationError::Timeout(_)
        )
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::NotFound(_) => "NOT_FOUND",
            ApplicationError::Unauthorized(_) => "UNAUTHORIZED",
            ApplicationError::Forbidden(_) => "FORBIDDEN",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApplicationError::Conflict(_) => "CONFLICT",
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
            ApplicationError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApplicationError::Timeout(_) => "TIMEOUT",
        }
    }
}

impl From<InfrastructureError> for ApplicationError {
    fn from(err: InfrastructureError) -> Self {
        if err.is_unique_violation() {
            return ApplicationError::Conflict(err.to_string());
        }
        match err {
            InfrastructureError::NotFound { .. } => ApplicationError::NotFound(err.to_string()),
            InfrastructureError::InvalidArgument(message) => ApplicationError::InvalidInput(message),
            InfrastructureError::Validation(domain) => ApplicationError::from(domain),
            InfrastructureError::Database(sqlx::Error::PoolTimedOut) => {
                ApplicationError::Timeout("Timed out waiting for a database connection".to_string())
            }
            other if other.is_retryable() => ApplicationError::ServiceUnavailable(other.to_string()),
            other => {
                error!(error = %other, "Unexpected infrastructure failure");
                ApplicationError::Internal(other.to_string())
            }
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        ApplicationError::ValidationFailed(err.to_string())
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
