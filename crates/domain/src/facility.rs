//! Facilities, their types, roles and members.

use crate::entity::AuditInfo;
use crate::errors::{DomainError, DomainResult};
use crate::validation;
use serde::{Deserialize, Serialize};

crate::text_enum! {
    /// Headcount band declared by a facility
    CompanySize {
        Small => "small",
        Medium => "medium",
        Large => "large",
        Enterprise => "enterprise",
    }
}

/// Category of facility (hospital, clinic, laboratory, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityType {
    pub id: i32,
    pub type_name: String,
    pub arabic_type_name: Option<String>,
    pub audit: AuditInfo,
}

impl FacilityType {
    /// Create a facility type row.
    pub fn new(id: i32, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            arabic_type_name: None,
            audit: AuditInfo::new(),
        }
    }
}

/// Role a member holds inside one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRole {
    pub id: i32,
    pub name: String,
    pub audit: AuditInfo,
}

/// Grant of a permission to a facility role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRolePermission {
    pub id: String,
    pub facility_role_id: i32,
    pub permission_id: String,
    pub audit: AuditInfo,
}

/// Accreditable organisation. Keyed by the owning user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub user_id: String,
    pub name: String,
    pub arabic_name: Option<String>,
    pub location: Option<String>,
    pub arabic_location: Option<String>,
    pub company_size: CompanySize,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tel: Option<String>,
    pub accreditation_id: String,
    pub facility_type_id: i32,
    pub audit: AuditInfo,
}

impl Facility {
    /// Create a facility owned by `user_id`.
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        accreditation_id: impl Into<String>,
        facility_type_id: i32,
        company_size: CompanySize,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            arabic_name: None,
            location: None,
            arabic_location: None,
            company_size,
            email: None,
            phone: None,
            tel: None,
            accreditation_id: accreditation_id.into(),
            facility_type_id,
            audit: AuditInfo::new(),
        }
    }
}

pub(crate) fn validate_facility(facility: &Facility) -> DomainResult<()> {
    validation::require_text("name", &facility.name)?;
    validation::max_length("name", &facility.name, 200)?;
    if let Some(email) = facility.email.as_deref() {
        validation::email("email", email)?;
    }
    validation::require_text("accreditation_id", &facility.accreditation_id)?;
    if facility.facility_type_id <= 0 {
        return Err(DomainError::field("facility_type_id", "must reference a facility type"));
    }
    Ok(())
}

/// Membership of a staff user in a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityUser {
    pub user_id: String,
    pub facility_id: String,
    pub facility_role_id: i32,
    pub audit: AuditInfo,
}

impl FacilityUser {
    /// Attach `user_id` to `facility_id` with the given role.
    pub fn new(user_id: impl Into<String>, facility_id: impl Into<String>, facility_role_id: i32) -> Self {
        Self {
            user_id: user_id.into(),
            facility_id: facility_id.into(),
            facility_role_id,
            audit: AuditInfo::new(),
        }
    }
}

crate::impl_entity!(FacilityType, i32, id);
crate::impl_entity!(FacilityRole, i32, id);
crate::impl_entity!(FacilityRolePermission, String, id);
crate::impl_entity!(Facility, String, user_id, validate = validate_facility);
crate::impl_entity!(FacilityUser, String, user_id);
