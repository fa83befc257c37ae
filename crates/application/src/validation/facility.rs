//! Facility, explore-user and facility-member requests

use super::user::validate_person;
use super::{Validatable, ValidationResult, ValidationRules};
use crate::audit::{AuditStamp, Auditable};
use accredigo_domain::identifiers::facility_roles;
use accredigo_domain::CompanySize;
use serde::{Deserialize, Serialize};

macro_rules! impl_auditable {
    ($($request:ty),+ $(,)?) => {
        $(impl Auditable for $request {
            fn audit_stamp(&self) -> &AuditStamp {
                &self.audit
            }

            fn audit_stamp_mut(&mut self) -> &mut AuditStamp {
                &mut self.audit
            }
        })+
    };
}

/// Register a facility together with its owner account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityRequest {
    pub name: String,
    pub arabic_name: Option<String>,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub tel: Option<String>,
    pub company_size: CompanySize,
    pub location: Option<String>,
    pub arabic_location: Option<String>,
    pub facility_type_id: i32,
    pub accreditation_id: String,
    #[serde(skip)]
    pub audit: AuditStamp,
}

impl Validatable for CreateFacilityRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = validate_person(
            &self.name,
            self.arabic_name.as_deref(),
            &self.email,
            self.phone.as_deref(),
        );
        if let Some(tel) = self.tel.as_deref() {
            result.merge(ValidationRules::validate_phone("tel", tel));
        }
        result.merge(ValidationRules::validate_optional_length(self.location.as_deref(), "location", 200));
        result.merge(ValidationRules::validate_optional_length(
            self.arabic_location.as_deref(),
            "arabic_location",
            200,
        ));
        result.merge(ValidationRules::validate_key(&self.accreditation_id, "accreditation_id"));
        if self.facility_type_id <= 0 {
            result.add_field_error("facility_type_id", "Must reference a facility type");
        }
        result
    }
}

/// Register an explore user with a trial window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExploreUserRequest {
    pub name: String,
    pub arabic_name: Option<String>,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// Trial length; the configured default applies when absent
    pub trial_days: Option<i64>,
    #[serde(skip)]
    pub audit: AuditStamp,
}

impl Validatable for CreateExploreUserRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = validate_person(
            &self.name,
            self.arabic_name.as_deref(),
            &self.email,
            self.phone.as_deref(),
        );
        if let Some(days) = self.trial_days {
            if !(1..=365).contains(&days) {
                result.add_field_error("trial_days", "Trial must last between 1 and 365 days");
            }
        }
        result
    }
}

/// Add a staff account to an existing facility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityUserRequest {
    pub name: String,
    pub arabic_name: Option<String>,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub facility_id: String,
    #[serde(default = "default_facility_role")]
    pub facility_role_id: i32,
    #[serde(skip)]
    pub audit: AuditStamp,
}

fn default_facility_role() -> i32 {
    facility_roles::MEMBER
}

impl Validatable for CreateFacilityUserRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = validate_person(
            &self.name,
            self.arabic_name.as_deref(),
            &self.email,
            self.phone.as_deref(),
        );
        result.merge(ValidationRules::validate_key(&self.facility_id, "facility_id"));
        if self.facility_role_id <= 0 {
            result.add_field_error("facility_role_id", "Must reference a facility role");
        }
        result
    }
}

impl_auditable!(CreateFacilityRequest, CreateExploreUserRequest, CreateFacilityUserRequest);
