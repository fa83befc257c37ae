//! Tests for the entity capability across the concrete domain types
//!
//! Key discovery, audit envelope defaults and enumeration text forms.

use accredigo_domain::{
    facility::CompanySize,
    subscription::{PaymentMethod, PaymentStatus, SubscriptionStatus},
    Accreditation, AuditInfo, Entity, EntityKey, Facility, FacilityType, FacilityUser,
    SubscriptionPlan, SystemRole, User,
};
use proptest::prelude::*;

// ============================================================================
// Key discovery
// ============================================================================

#[test]
fn test_key_fields_are_declared_per_type() {
    assert_eq!(User::KEY_FIELD, "id");
    assert_eq!(Accreditation::KEY_FIELD, "id");
    assert_eq!(SubscriptionPlan::KEY_FIELD, "id");
    assert_eq!(Facility::KEY_FIELD, "user_id");
    assert_eq!(FacilityUser::KEY_FIELD, "user_id");
    assert_eq!(SystemRole::KEY_FIELD, "id");
    assert_eq!(FacilityType::KEY_FIELD, "id");
}

#[test]
fn test_unassigned_keys_are_detected() {
    let user = User::new("", "Amal", "a@b.com", "hash", 1);
    assert!(!user.has_key());

    let role = SystemRole::new(0, "Nobody");
    assert!(!role.has_key());

    let role = SystemRole::new(4, "Admin");
    assert!(role.has_key());
}

#[test]
fn test_new_entities_are_not_deleted() {
    let plan = SubscriptionPlan::new("p1", "Basic", 100);
    assert!(!plan.is_deleted());
    assert_eq!(plan.audit().created_at, plan.audit().updated_at);
    assert!(plan.audit().created_by.is_none());
}

#[test]
fn test_audit_created_by_sets_both_actors() {
    let audit = AuditInfo::created_by("admin-7");
    assert_eq!(audit.created_by.as_deref(), Some("admin-7"));
    assert_eq!(audit.updated_by.as_deref(), Some("admin-7"));
}

// ============================================================================
// Enumerations
// ============================================================================

#[test]
fn test_enum_text_forms_parse_back() {
    for size in CompanySize::all() {
        assert_eq!(size.as_str().parse::<CompanySize>().unwrap(), *size);
    }
    for status in SubscriptionStatus::all() {
        assert_eq!(status.as_str().parse::<SubscriptionStatus>().unwrap(), *status);
    }
    for method in PaymentMethod::all() {
        assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), *method);
    }
    for status in PaymentStatus::all() {
        assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), *status);
    }
}

#[test]
fn test_enum_serde_matches_stored_text() {
    for status in PaymentStatus::all() {
        let json = serde_json::to_string(status).unwrap();
        assert_eq!(json, format!("\"{}\"", status.as_str()));
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #[test]
    fn prop_whitespace_keys_are_unset(spaces in "[ \t]{0,8}") {
        prop_assert!(spaces.is_unset());
    }

    #[test]
    fn prop_non_blank_keys_are_set(key in "[a-z0-9-]{1,36}") {
        prop_assert!(!key.is_unset());
    }

    #[test]
    fn prop_nonzero_integer_keys_are_set(key in 1i32..i32::MAX) {
        prop_assert!(!key.is_unset());
    }
}
