//! Facility DTOs.

use accredigo_domain::{CompanySize, Facility};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::MapFrom;

/// Facility profile, keyed by its owner account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityDto {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_location: Option<String>,
    pub company_size: CompanySize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    pub accreditation_id: String,
    pub facility_type_id: i32,
    pub created_at: DateTime<Utc>,
}

impl MapFrom<&Facility> for FacilityDto {
    fn map_from(facility: &Facility) -> Self {
        Self {
            user_id: facility.user_id.clone(),
            name: facility.name.clone(),
            arabic_name: facility.arabic_name.clone(),
            location: facility.location.clone(),
            arabic_location: facility.arabic_location.clone(),
            company_size: facility.company_size,
            email: facility.email.clone(),
            phone: facility.phone.clone(),
            tel: facility.tel.clone(),
            accreditation_id: facility.accreditation_id.clone(),
            facility_type_id: facility.facility_type_id,
            created_at: facility.audit.created_at,
        }
    }
}
