//! Infrastructure layer for AccrediGo
//!
//! This crate provides:
//! - Database access (SQLite with sqlx) and embedded migrations
//! - Table mappings for the domain entities
//! - A generic repository per entity type
//! - The unit of work that owns the transaction and the repository registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use accredigo_common::AppConfig;
//! use accredigo_infrastructure::{DatabaseConfig, DatabasePool, Repository, UnitOfWork};
//!
//! let config = AppConfig::load()?;
//! let pool = DatabasePool::new(&DatabaseConfig::from(&config.database)).await?;
//! pool.migrate().await?;
//!
//! let uow = UnitOfWork::new(&pool).with_actor("admin");
//! uow.users()?.add(&user).await?;
//! uow.save_changes().await?;
//! uow.dispose().await?;
//! ```

pub mod database;
pub mod mapping;
pub mod query;
pub mod repositories;
mod session;
pub mod unit_of_work;
pub mod values;

pub use database::{DatabaseConfig, DatabasePool, HealthStatus};
pub use mapping::{Related, TableMapping, AUDIT_COLUMNS};
pub use query::{Filter, FilterOp, ListQuery};
pub use repositories::{Repository, SqlRepository};
pub use unit_of_work::UnitOfWork;
pub use values::{SqlValue, ToSqlValue};

use accredigo_domain::DomainError;

/// Result type for infrastructure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database errors from sqlx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No row exists for the key
    #[error("{entity} with key '{key}' was not found")]
    NotFound {
        /// Entity type name
        entity: &'static str,
        /// Key rendered as text
        key: String,
    },

    /// Caller broke an operation's contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity failed domain validation
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    /// The unit of work has been disposed
    #[error("Unit of work has been disposed")]
    Disposed,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Error::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn key_not_set(entity: &'static str, key_field: &'static str) -> Self {
        Error::InvalidArgument(format!(
            "Key property '{key_field}' must be set before adding/updating {entity}."
        ))
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Database(sqlx::Error::PoolTimedOut) | Error::Database(sqlx::Error::Io(_))
        )
    }

    /// Whether a unique or primary-key constraint rejected the statement.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::Database(e) => e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::InvalidArgument(_) | Error::Validation(_) => 400,
            Error::Database(_) if self.is_unique_violation() => 409,
            Error::Database(_) => 503,
            Error::Migration(_) | Error::Configuration(_) | Error::Disposed => 500,
        }
    }
}
