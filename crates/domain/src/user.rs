//! Users, system roles and permissions.

use crate::entity::AuditInfo;
use crate::errors::{DomainError, DomainResult};
use crate::validation;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Platform-wide role (facility, staff, explore, admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRole {
    pub id: i32,
    pub name: String,
    pub audit: AuditInfo,
}

impl SystemRole {
    /// Create a role row.
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            audit: AuditInfo::new(),
        }
    }
}

/// Named capability that roles may grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub code: String,
    pub description: Option<String>,
    pub audit: AuditInfo,
}

impl Permission {
    /// Create a permission with the given code.
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            description: None,
            audit: AuditInfo::new(),
        }
    }
}

/// Grant of a permission to a system role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRolePermission {
    pub id: String,
    pub system_role_id: i32,
    pub permission_id: String,
    pub audit: AuditInfo,
}

/// Registered account.
///
/// `password` always holds a hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub arabic_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub system_role_id: i32,
    pub phone_number: Option<String>,
    pub audit: AuditInfo,
}

impl User {
    /// Create a user; the key must be assigned by the caller.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        system_role_id: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arabic_name: None,
            email: email.into(),
            password: password_hash.into(),
            system_role_id,
            phone_number: None,
            audit: AuditInfo::new(),
        }
    }
}

pub(crate) fn validate_user(user: &User) -> DomainResult<()> {
    validation::require_text("name", &user.name)?;
    validation::max_length("name", &user.name, 100)?;
    validation::max_length_opt("arabic_name", user.arabic_name.as_deref(), 100)?;
    validation::email("email", &user.email)?;
    validation::require_text("password", &user.password)?;
    validation::max_length_opt("phone_number", user.phone_number.as_deref(), 20)?;
    if user.system_role_id <= 0 {
        return Err(DomainError::field("system_role_id", "must reference a role"));
    }
    Ok(())
}

/// Trial window granted to an explore user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreUserAccess {
    pub user_id: String,
    pub trial_start: DateTime<Utc>,
    pub trial_end: DateTime<Utc>,
    pub audit: AuditInfo,
}

impl ExploreUserAccess {
    /// Trial starting now and lasting `days`.
    pub fn starting_now(user_id: impl Into<String>, days: i64) -> Self {
        let start = Utc::now();
        Self {
            user_id: user_id.into(),
            trial_start: start,
            trial_end: start + Duration::days(days),
            audit: AuditInfo::new(),
        }
    }

    /// Whether `at` falls inside the trial window.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        !self.audit.is_deleted && at >= self.trial_start && at <= self.trial_end
    }
}

pub(crate) fn validate_explore_access(access: &ExploreUserAccess) -> DomainResult<()> {
    if access.trial_end < access.trial_start {
        return Err(DomainError::InvalidRange {
            start: "trial_start",
            end: "trial_end",
        });
    }
    Ok(())
}

/// Append-only record of something a user did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActionLog {
    pub id: String,
    pub user_id: String,
    pub action: String,
    pub context: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub audit: AuditInfo,
}

impl UserActionLog {
    /// Record `action` for `user_id` at the current time.
    pub fn record(id: impl Into<String>, user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            action: action.into(),
            context: None,
            occurred_at: Utc::now(),
            audit: AuditInfo::new(),
        }
    }
}

crate::impl_entity!(SystemRole, i32, id);
crate::impl_entity!(Permission, String, id);
crate::impl_entity!(SystemRolePermission, String, id);
crate::impl_entity!(User, String, id, validate = validate_user);
crate::impl_entity!(ExploreUserAccess, String, user_id, validate = validate_explore_access);
crate::impl_entity!(UserActionLog, String, id);
