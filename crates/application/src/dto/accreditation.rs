//! Accreditation programme DTOs.

use accredigo_domain::Accreditation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::MapFrom;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arabic_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MapFrom<&Accreditation> for AccreditationDto {
    fn map_from(accreditation: &Accreditation) -> Self {
        Self {
            id: accreditation.id.clone(),
            name: accreditation.name.clone(),
            arabic_name: accreditation.arabic_name.clone(),
            description: accreditation.description.clone(),
            arabic_description: accreditation.arabic_description.clone(),
            created_at: accreditation.audit.created_at,
        }
    }
}
