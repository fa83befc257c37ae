//! Test fixtures with realistic, randomised data.

use accredigo_domain::{
    identifiers::system_roles, new_id, Accreditation, ExploreUserAccess, SubscriptionPlan, User,
};
use fake::{
    faker::{
        company::en::CompanyName,
        lorem::en::Sentence,
        name::en::Name,
    },
    Fake,
};
use proptest::prelude::*;

use crate::builders::{AccreditationBuilder, SubscriptionPlanBuilder, UserBuilder};

/// Create a test user with default values
pub fn create_test_user() -> User {
    create_test_user_with_role(system_roles::STAFF)
}

/// Create a test user with a specific role
pub fn create_test_user_with_role(system_role_id: i32) -> User {
    UserBuilder::new()
        .with_name(Name().fake::<String>())
        .with_phone(format!("+9665{}", (10_000_000..99_999_999).fake::<u32>()))
        .with_role(system_role_id)
        .build()
}

/// Create `count` users with distinct keys and e-mails.
pub fn create_test_users(count: usize) -> Vec<User> {
    (0..count).map(|_| create_test_user()).collect()
}

/// Create a test accreditation
pub fn create_test_accreditation() -> Accreditation {
    AccreditationBuilder::new()
        .with_name(CompanyName().fake::<String>())
        .with_description(Sentence(3..8).fake::<String>())
        .build()
}

/// Create a test subscription plan
pub fn create_test_subscription_plan() -> SubscriptionPlan {
    SubscriptionPlanBuilder::new()
        .with_plan_type(format!("Plan {}", (1..100).fake::<u32>()))
        .with_pricing((50..5000).fake::<i32>())
        .build()
}

/// Trial window for an explore user.
pub fn create_test_explore_access(user_id: impl Into<String>) -> ExploreUserAccess {
    ExploreUserAccess::starting_now(user_id, 14)
}

prop_compose! {
    /// Arbitrary valid user.
    pub fn arb_user()(
        name in "[A-Za-z][A-Za-z ]{0,40}",
        role in 1i32..=4,
        phone in proptest::option::of("[0-9+]{6,20}"),
    ) -> User {
        let mut builder = UserBuilder::new().with_id(new_id()).with_name(name).with_role(role);
        if let Some(phone) = phone {
            builder = builder.with_phone(phone);
        }
        builder.build()
    }
}
