//! Testing utilities for AccrediGo
//!
//! This crate provides:
//! - Test fixtures for the domain entities
//! - Builder patterns for test data construction
//! - Throw-away, migrated SQLite databases
//!
//! # Examples
//!
//! ```no_run
//! use accredigo_testing::{builders::UserBuilder, TestDatabase};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let db = TestDatabase::new().await?;
//! let uow = db.unit_of_work();
//! let user = UserBuilder::new().with_name("Sara").build();
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod database;
pub mod fixtures;

// Re-export commonly used types
pub use builders::*;
pub use database::{TestDatabase, HOSPITAL_FACILITY_TYPE};
pub use fixtures::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
