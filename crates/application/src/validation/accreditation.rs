//! Accreditation programme requests

use super::{Validatable, ValidationResult, ValidatorExt};
use crate::audit::{AuditStamp, Auditable};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccreditationRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 200))]
    pub arabic_name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 2000))]
    pub arabic_description: Option<String>,
    #[serde(skip)]
    pub audit: AuditStamp,
}

impl Validatable for CreateAccreditationRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = self.to_validation_result();
        if self.name.trim().is_empty() {
            result.add_field_error("name", "Name cannot be blank");
        }
        result
    }
}

impl Auditable for CreateAccreditationRequest {
    fn audit_stamp(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_stamp_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Paged accreditation listing with optional search
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListAccreditationsRequest {
    #[validate(length(max = 200))]
    pub free_text: Option<String>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
}

impl Validatable for ListAccreditationsRequest {
    fn validate_all(&self) -> ValidationResult {
        self.to_validation_result()
    }
}
