//! User-facing DTOs: accounts, explore users and facility members.

use accredigo_domain::{ExploreUserAccess, FacilityUser, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::MapFrom;

/// User account without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    pub email: String,
    pub system_role_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MapFrom<&User> for UserDto {
    fn map_from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            arabic_name: user.arabic_name.clone(),
            email: user.email.clone(),
            system_role_id: user.system_role_id,
            phone_number: user.phone_number.clone(),
            created_at: user.audit.created_at,
            updated_at: user.audit.updated_at,
        }
    }
}

/// Explore (trial) user with their access window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreUserDto {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub trial_start: DateTime<Utc>,
    pub trial_end: DateTime<Utc>,
    pub is_active: bool,
}

impl MapFrom<&(User, ExploreUserAccess)> for ExploreUserDto {
    fn map_from((user, access): &(User, ExploreUserAccess)) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            arabic_name: user.arabic_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            trial_start: access.trial_start,
            trial_end: access.trial_end,
            is_active: access.is_active_at(Utc::now()),
        }
    }
}

/// Facility member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityUserDto {
    pub user_id: String,
    pub facility_id: String,
    pub facility_role_id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MapFrom<&(User, FacilityUser)> for FacilityUserDto {
    fn map_from((user, member): &(User, FacilityUser)) -> Self {
        Self {
            user_id: user.id.clone(),
            facility_id: member.facility_id.clone(),
            facility_role_id: member.facility_role_id,
            name: user.name.clone(),
            arabic_name: user.arabic_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            created_at: member.audit.created_at,
        }
    }
}
