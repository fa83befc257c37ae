//! AccrediGo Domain Types
//!
//! This crate provides the entity model for the AccrediGo accreditation
//! platform: users and roles, facilities and their members, accreditation
//! programmes, gap-analysis sessions and subscription billing.
//!
//! ## Architecture
//!
//! - **entity**: the [`Entity`] capability (compile-time key field, audit envelope)
//! - **identifiers**: key generation and seeded role identifiers
//! - **user**: users, system roles, permissions, explore access, action logs
//! - **facility**: facilities, facility types, facility roles and members
//! - **accreditation**: accreditation programmes and gap-analysis sessions
//! - **subscription**: plans, features, subscriptions and payments
//! - **errors**: domain invariant violations
//! - **validation**: shared field checks
//!
//! ## Usage
//!
//! ```rust
//! use accredigo_domain::{identifiers::new_id, user::User, Entity};
//!
//! let user = User::new(new_id(), "Amal", "amal@example.com", "hash", 1);
//! assert!(user.has_key());
//! assert_eq!(User::KEY_FIELD, "id");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)]

pub mod entity;
pub mod errors;
pub mod identifiers;
pub mod validation;

pub mod accreditation;
pub mod facility;
pub mod subscription;
pub mod user;

// Re-export commonly used types
pub use entity::{AuditInfo, Entity, EntityKey};
pub use errors::{DomainError, DomainResult};
pub use identifiers::new_id;

pub use accreditation::{Accreditation, GapAnalysisSession};
pub use facility::{CompanySize, Facility, FacilityRole, FacilityRolePermission, FacilityType, FacilityUser};
pub use subscription::{
    Feature, Payment, PaymentMethod, PaymentStatus, Subscription, SubscriptionPlan,
    SubscriptionPlanFeature, SubscriptionStatus,
};
pub use user::{ExploreUserAccess, Permission, SystemRole, SystemRolePermission, User, UserActionLog};
