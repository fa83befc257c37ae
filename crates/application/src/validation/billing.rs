//! Subscription plan requests

use super::{Validatable, ValidationResult, ValidatorExt};
use crate::audit::{AuditStamp, Auditable};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionPlanRequest {
    #[validate(length(min = 1, max = 50, message = "Plan type must be between 1 and 50 characters"))]
    pub plan_type: String,
    #[validate(range(min = 0, message = "Pricing cannot be negative"))]
    pub pricing: i32,
    #[serde(skip)]
    pub audit: AuditStamp,
}

impl Validatable for CreateSubscriptionPlanRequest {
    fn validate_all(&self) -> ValidationResult {
        self.to_validation_result()
    }
}

impl Auditable for CreateSubscriptionPlanRequest {
    fn audit_stamp(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_stamp_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionPlanRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 50, message = "Plan type must be between 1 and 50 characters"))]
    pub plan_type: String,
    #[validate(range(min = 0, message = "Pricing cannot be negative"))]
    pub pricing: i32,
}

impl Validatable for UpdateSubscriptionPlanRequest {
    fn validate_all(&self) -> ValidationResult {
        self.to_validation_result()
    }
}
