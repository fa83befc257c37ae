//! Entity capability shared by every persisted type.
//!
//! Each entity names exactly one key field at compile time through the
//! [`Entity`] trait and carries an [`AuditInfo`] envelope. Persistence code
//! discovers the key through the trait, so a type without a key cannot be
//! handed to a repository at all.

use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// A value usable as an entity key.
pub trait EntityKey: Clone + Debug + Display + PartialEq + Send + Sync + 'static {
    /// Whether the key still holds its "not assigned" value.
    fn is_unset(&self) -> bool;
}

impl EntityKey for String {
    fn is_unset(&self) -> bool {
        self.trim().is_empty()
    }
}

impl EntityKey for i32 {
    fn is_unset(&self) -> bool {
        *self == 0
    }
}

impl EntityKey for i64 {
    fn is_unset(&self) -> bool {
        *self == 0
    }
}

/// Audit envelope stored alongside every entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditInfo {
    /// Set once, when the entity value is constructed.
    pub created_at: DateTime<Utc>,
    /// Actor that created the entity, when known.
    pub created_by: Option<String>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
    /// Actor that last mutated the entity, when known.
    pub updated_by: Option<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

impl AuditInfo {
    /// Fresh envelope stamped with the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            created_by: None,
            updated_at: now,
            updated_by: None,
            is_deleted: false,
        }
    }

    /// Fresh envelope attributed to `actor`.
    pub fn created_by(actor: impl Into<String>) -> Self {
        let actor = actor.into();
        Self {
            created_by: Some(actor.clone()),
            updated_by: Some(actor),
            ..Self::new()
        }
    }

    /// Record a mutation.
    pub fn touch(&mut self, actor: Option<&str>) {
        self.updated_at = Utc::now();
        if let Some(actor) = actor {
            self.updated_by = Some(actor.to_string());
        }
    }

    /// Flag as deleted and record the mutation.
    pub fn mark_deleted(&mut self, actor: Option<&str>) {
        self.is_deleted = true;
        self.touch(actor);
    }
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted domain entity with a single, compile-time key field.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Type of the key field.
    type Key: EntityKey;

    /// Entity type name used in errors and logs.
    const NAME: &'static str;

    /// Name of the key field.
    const KEY_FIELD: &'static str;

    /// Current key value.
    fn key(&self) -> &Self::Key;

    /// Audit envelope.
    fn audit(&self) -> &AuditInfo;

    /// Mutable audit envelope.
    fn audit_mut(&mut self) -> &mut AuditInfo;

    /// Field-level invariants beyond key presence.
    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Whether the key is still unassigned.
    fn has_key(&self) -> bool {
        !self.key().is_unset()
    }

    /// Whether the entity is soft-deleted.
    fn is_deleted(&self) -> bool {
        self.audit().is_deleted
    }
}

/// Implement [`Entity`] for a struct with an `audit: AuditInfo` field.
///
/// ```ignore
/// impl_entity!(User, String, id);
/// impl_entity!(Payment, String, id, validate = validate_payment);
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($ty:ident, $key_ty:ty, $key_field:ident) => {
        $crate::impl_entity!(@impl $ty, $key_ty, $key_field, |_: &$ty| Ok(()));
    };
    ($ty:ident, $key_ty:ty, $key_field:ident, validate = $validate:path) => {
        $crate::impl_entity!(@impl $ty, $key_ty, $key_field, $validate);
    };
    (@impl $ty:ident, $key_ty:ty, $key_field:ident, $validate:expr) => {
        impl $crate::entity::Entity for $ty {
            type Key = $key_ty;

            const NAME: &'static str = stringify!($ty);
            const KEY_FIELD: &'static str = stringify!($key_field);

            fn key(&self) -> &Self::Key {
                &self.$key_field
            }

            fn audit(&self) -> &$crate::entity::AuditInfo {
                &self.audit
            }

            fn audit_mut(&mut self) -> &mut $crate::entity::AuditInfo {
                &mut self.audit
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::errors::DomainError> {
                ($validate)(self)
            }
        }
    };
}

/// Enumeration persisted as snake_case text.
///
/// Generates `as_str`, `all`, `Display` and a `FromStr` that fails with
/// [`DomainError::UnknownVariant`].
#[macro_export]
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Stored text form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Every variant, in declaration order.
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::errors::DomainError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::errors::DomainError::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}
