//! Identifier helpers.
//!
//! String keys are GUID text generated by the application before an entity
//! is staged; repositories never assign keys. Integer keys are used by the
//! seeded reference tables (roles, facility types).

use uuid::Uuid;

/// Generate a fresh string key (hyphenated UUID v4).
#[inline]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Well-known system role identifiers seeded by the initial migration.
pub mod system_roles {
    /// Facility owner account
    pub const FACILITY: i32 = 1;
    /// Staff member of a facility
    pub const STAFF: i32 = 2;
    /// Explore (trial) user
    pub const EXPLORE: i32 = 3;
    /// Platform administrator
    pub const ADMIN: i32 = 4;
}

/// Well-known facility role identifiers seeded by the initial migration.
pub mod facility_roles {
    /// Facility manager
    pub const MANAGER: i32 = 1;
    /// Regular staff member
    pub const MEMBER: i32 = 2;
}
