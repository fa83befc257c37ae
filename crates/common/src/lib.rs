//! Common utilities and shared functionality for the AccrediGo platform.
//!
//! This crate provides foundational utilities used across all layers:
//! - Configuration management
//! - Telemetry (structured logging)
//! - Pagination and sorting parameters
//! - Password hashing

pub mod config;
pub mod crypto;
pub mod pagination;
pub mod telemetry;

// Re-export commonly used types
pub use config::{AppConfig, AuthConfig, DatabaseSettings, PaginationConfig, TelemetryConfig};
pub use crypto::{hash_password, verify_password};
pub use pagination::{PaginatedResult, PaginationParams, SortDirection, SortParams};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
