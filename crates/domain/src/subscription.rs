//! Subscription plans, features, subscriptions and payments.

use crate::entity::AuditInfo;
use crate::errors::{DomainError, DomainResult};
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::text_enum! {
    /// Lifecycle of a facility subscription
    SubscriptionStatus {
        Pending => "pending",
        Active => "active",
        Expired => "expired",
        Cancelled => "cancelled",
    }
}

crate::text_enum! {
    /// How a payment was made
    PaymentMethod {
        CreditCard => "credit_card",
        DebitCard => "debit_card",
        BankTransfer => "bank_transfer",
        PayPal => "pay_pal",
        Cash => "cash",
    }
}

crate::text_enum! {
    /// Settlement state of a payment
    PaymentStatus {
        Paid => "paid",
        Pending => "pending",
        Failed => "failed",
        Refunded => "refunded",
        Cancelled => "cancelled",
    }
}

/// Sellable plan (basic, premium, ...). Pricing is in whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    pub plan_type: String,
    pub pricing: i32,
    pub audit: AuditInfo,
}

impl SubscriptionPlan {
    /// Create a plan; the key must be assigned by the caller.
    pub fn new(id: impl Into<String>, plan_type: impl Into<String>, pricing: i32) -> Self {
        Self {
            id: id.into(),
            plan_type: plan_type.into(),
            pricing,
            audit: AuditInfo::new(),
        }
    }
}

pub(crate) fn validate_plan(plan: &SubscriptionPlan) -> DomainResult<()> {
    validation::require_text("plan_type", &plan.plan_type)?;
    validation::max_length("plan_type", &plan.plan_type, 50)?;
    if plan.pricing < 0 {
        return Err(DomainError::field("pricing", "must not be negative"));
    }
    Ok(())
}

/// Marketing feature line shown on plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub text: String,
    pub arabic_text: Option<String>,
    pub audit: AuditInfo,
}

/// Inclusion of a feature in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlanFeature {
    pub id: String,
    pub subscription_plan_id: String,
    pub feature_id: String,
    pub audit: AuditInfo,
}

/// A facility's purchase of a plan for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub facility_id: String,
    pub plan_id: String,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub status: SubscriptionStatus,
    pub amount: f64,
    pub audit: AuditInfo,
}

impl Subscription {
    /// Whether the subscription grants access at `at`.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active
            && !self.audit.is_deleted
            && at >= self.start_date
            && at <= self.expiry_date
    }
}

pub(crate) fn validate_subscription(subscription: &Subscription) -> DomainResult<()> {
    if subscription.expiry_date < subscription.start_date {
        return Err(DomainError::InvalidRange {
            start: "start_date",
            end: "expiry_date",
        });
    }
    validation::non_negative("amount", subscription.amount)
}

/// Money received against a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub facility_id: String,
    pub subscription_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
    pub currency: String,
    pub audit: AuditInfo,
}

pub(crate) fn validate_payment(payment: &Payment) -> DomainResult<()> {
    validation::non_negative("amount", payment.amount)?;
    validation::currency_code("currency", &payment.currency)
}

crate::impl_entity!(SubscriptionPlan, String, id, validate = validate_plan);
crate::impl_entity!(Feature, String, id);
crate::impl_entity!(SubscriptionPlanFeature, String, id);
crate::impl_entity!(Subscription, String, id, validate = validate_subscription);
crate::impl_entity!(Payment, String, id, validate = validate_payment);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use chrono::Duration;

    fn subscription() -> Subscription {
        let start = Utc::now();
        Subscription {
            id: "s1".to_string(),
            facility_id: "f1".to_string(),
            plan_id: "p1".to_string(),
            start_date: start,
            expiry_date: start + Duration::days(30),
            status: SubscriptionStatus::Active,
            amount: 499.0,
            audit: AuditInfo::new(),
        }
    }

    #[test]
    fn test_payment_method_text() {
        assert_eq!(PaymentMethod::PayPal.as_str(), "pay_pal");
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"credit_card\""
        );
    }

    #[test]
    fn test_subscription_window() {
        let sub = subscription();
        assert!(sub.validate().is_ok());
        assert!(sub.is_active_at(sub.start_date + Duration::days(1)));

        let mut expired = sub.clone();
        expired.status = SubscriptionStatus::Expired;
        assert!(!expired.is_active_at(sub.start_date + Duration::days(1)));

        let mut inverted = sub;
        inverted.expiry_date = inverted.start_date - Duration::days(1);
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_plan_validation() {
        assert!(SubscriptionPlan::new("p1", "Premium", 1000).validate().is_ok());
        assert!(SubscriptionPlan::new("p1", "Premium", -1).validate().is_err());
    }
}
