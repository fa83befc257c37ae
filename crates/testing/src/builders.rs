//! Fluent builder pattern for constructing test data.
//!
//! Builders assign fresh GUID keys, so built entities are ready to stage.

use accredigo_domain::{
    identifiers::system_roles, new_id, Accreditation, Payment, PaymentMethod, PaymentStatus,
    Subscription, SubscriptionPlan, SubscriptionStatus, User,
};
use accredigo_domain::AuditInfo;
use chrono::{Duration, Utc};

/// Placeholder hash; tests that verify passwords hash their own.
pub const TEST_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGVzdHNhbHQ$dGVzdGhhc2g";

/// Builder for creating User test instances
#[derive(Clone)]
pub struct UserBuilder {
    id: String,
    name: String,
    arabic_name: Option<String>,
    email: Option<String>,
    password: String,
    system_role_id: i32,
    phone_number: Option<String>,
}

impl UserBuilder {
    pub fn new() -> Self {
        Self {
            id: new_id(),
            name: "Test User".to_string(),
            arabic_name: None,
            email: None,
            password: TEST_PASSWORD_HASH.to_string(),
            system_role_id: system_roles::STAFF,
            phone_number: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_arabic_name(mut self, name: impl Into<String>) -> Self {
        self.arabic_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password = hash.into();
        self
    }

    pub fn with_role(mut self, system_role_id: i32) -> Self {
        self.system_role_id = system_role_id;
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    pub fn admin(self) -> Self {
        self.with_role(system_roles::ADMIN)
    }

    pub fn build(self) -> User {
        // e-mail is unique per table, so derive the default from the key
        let email = self
            .email
            .unwrap_or_else(|| format!("user-{}@example.com", self.id));
        let mut user = User::new(self.id, self.name, email, self.password, self.system_role_id);
        user.arabic_name = self.arabic_name;
        user.phone_number = self.phone_number;
        user
    }
}

impl Default for UserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating Accreditation test instances
#[derive(Clone)]
pub struct AccreditationBuilder {
    id: String,
    name: String,
    arabic_name: Option<String>,
    description: Option<String>,
}

impl AccreditationBuilder {
    pub fn new() -> Self {
        Self {
            id: new_id(),
            name: "JCI".to_string(),
            arabic_name: None,
            description: Some("Joint Commission International".to_string()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_arabic_name(mut self, name: impl Into<String>) -> Self {
        self.arabic_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Accreditation {
        let mut accreditation = Accreditation::new(self.id, self.name);
        accreditation.arabic_name = self.arabic_name;
        accreditation.description = self.description;
        accreditation
    }
}

impl Default for AccreditationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating SubscriptionPlan test instances
#[derive(Clone)]
pub struct SubscriptionPlanBuilder {
    id: String,
    plan_type: String,
    pricing: i32,
}

impl SubscriptionPlanBuilder {
    pub fn new() -> Self {
        Self {
            id: new_id(),
            plan_type: "Basic".to_string(),
            pricing: 100,
        }
    }

    pub fn with_plan_type(mut self, plan_type: impl Into<String>) -> Self {
        self.plan_type = plan_type.into();
        self
    }

    pub fn with_pricing(mut self, pricing: i32) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn build(self) -> SubscriptionPlan {
        SubscriptionPlan::new(self.id, self.plan_type, self.pricing)
    }
}

impl Default for SubscriptionPlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a subscription and, optionally, its first payment.
#[derive(Clone)]
pub struct SubscriptionBuilder {
    facility_id: String,
    plan_id: String,
    days: i64,
    status: SubscriptionStatus,
    amount: f64,
}

impl SubscriptionBuilder {
    pub fn new(facility_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            facility_id: facility_id.into(),
            plan_id: plan_id.into(),
            days: 30,
            status: SubscriptionStatus::Active,
            amount: 100.0,
        }
    }

    pub fn with_days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn with_status(mut self, status: SubscriptionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn build(self) -> Subscription {
        let start = Utc::now();
        Subscription {
            id: new_id(),
            facility_id: self.facility_id,
            plan_id: self.plan_id,
            start_date: start,
            expiry_date: start + Duration::days(self.days),
            status: self.status,
            amount: self.amount,
            audit: AuditInfo::new(),
        }
    }

    /// Paid-in-full payment for `subscription`.
    pub fn payment_for(subscription: &Subscription, method: PaymentMethod) -> Payment {
        Payment {
            id: new_id(),
            facility_id: subscription.facility_id.clone(),
            subscription_id: subscription.id.clone(),
            amount: subscription.amount,
            method,
            status: PaymentStatus::Paid,
            paid_at: Utc::now(),
            currency: "SAR".to_string(),
            audit: AuditInfo::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accredigo_domain::Entity;

    #[test]
    fn test_user_builder_defaults_are_valid() {
        let user = UserBuilder::new().build();
        assert!(user.has_key());
        assert!(user.validate().is_ok());
        assert!(user.email.ends_with("@example.com"));
    }

    #[test]
    fn test_user_builder_overrides() {
        let user = UserBuilder::new()
            .with_name("Sara")
            .with_email("sara@clinic.sa")
            .with_phone("+966500000000")
            .admin()
            .build();
        assert_eq!(user.name, "Sara");
        assert_eq!(user.email, "sara@clinic.sa");
        assert_eq!(user.system_role_id, system_roles::ADMIN);
    }

    #[test]
    fn test_subscription_builder() {
        let subscription = SubscriptionBuilder::new("f1", "p1").with_days(10).build();
        assert!(subscription.validate().is_ok());
        let payment = SubscriptionBuilder::payment_for(&subscription, PaymentMethod::Cash);
        assert_eq!(payment.subscription_id, subscription.id);
        assert!(payment.validate().is_ok());
    }
}
