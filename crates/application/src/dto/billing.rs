//! Billing DTOs.

use accredigo_domain::SubscriptionPlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::MapFrom;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlanDto {
    pub id: String,
    pub plan_type: String,
    /// Price in whole currency units
    pub pricing: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MapFrom<&SubscriptionPlan> for SubscriptionPlanDto {
    fn map_from(plan: &SubscriptionPlan) -> Self {
        Self {
            id: plan.id.clone(),
            plan_type: plan.plan_type.clone(),
            pricing: plan.pricing,
            created_at: plan.audit.created_at,
            updated_at: plan.audit.updated_at,
        }
    }
}
