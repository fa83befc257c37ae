//! Integration tests for the generic repository.
//!
//! Every test runs against its own migrated SQLite database in a temporary
//! directory.

use accredigo_common::{PaginationParams, SortDirection, SortParams};
use accredigo_domain::{
    identifiers::{facility_roles, system_roles},
    new_id, Entity, Facility, FacilityUser, Payment, PaymentMethod, Subscription,
    SubscriptionStatus, SystemRole, User,
};
use accredigo_infrastructure::{Error, Filter, ListQuery, Repository};
use accredigo_testing::{
    builders::{SubscriptionBuilder, SubscriptionPlanBuilder, UserBuilder},
    fixtures::{create_test_user, create_test_users},
    TestDatabase,
};

#[tokio::test]
async fn test_add_save_get_returns_equal_entity() {
    let db = TestDatabase::new().await.unwrap();
    let user = UserBuilder::new()
        .with_name("Sara Al-Qahtani")
        .with_arabic_name("سارة القحطاني")
        .with_phone("+966500000001")
        .build();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add(&user).await.unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 1);

    let fetched = users.get_by_id(&user.id).await.unwrap();
    assert_eq!(fetched, Some(user));
    uow.dispose().await.unwrap();
}

#[tokio::test]
async fn test_get_by_id_missing_returns_none() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();

    let fetched = uow.users().unwrap().get_by_id(&new_id()).await.unwrap();
    assert!(fetched.is_none());
    assert!(!uow.users().unwrap().exists(&new_id()).await.unwrap());
}

#[tokio::test]
async fn test_removed_entity_hidden_from_reads() {
    let db = TestDatabase::new().await.unwrap();
    let mut gone = UserBuilder::new().with_name("Gone").build();
    let kept = UserBuilder::new().with_name("Kept").build();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add_range(&[gone.clone(), kept.clone()]).await.unwrap();
    uow.save_changes().await.unwrap();

    users.remove(&mut gone).await.unwrap();
    assert!(gone.is_deleted());
    assert_eq!(uow.save_changes().await.unwrap(), 1);

    assert!(users.get_by_id(&gone.id).await.unwrap().is_none());
    assert!(!users.exists(&gone.id).await.unwrap());
    assert!(users.exists(&kept.id).await.unwrap());

    let including = users
        .get_by_id_including_deleted(&gone.id)
        .await
        .unwrap()
        .expect("soft-deleted row still stored");
    assert!(including.audit.is_deleted);

    assert_eq!(users.get_all(ListQuery::new()).await.unwrap().len(), 1);
    assert_eq!(
        users.get_all(ListQuery::new().include_deleted()).await.unwrap().len(),
        2
    );
    assert_eq!(users.count(ListQuery::new()).await.unwrap(), 1);
    assert!(users
        .find(Filter::eq("email", gone.email.as_str()))
        .await
        .unwrap()
        .is_empty());

    let page = users
        .get_paged(PaginationParams::new(1, 10), ListQuery::new())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, kept.id);
    uow.dispose().await.unwrap();
}

#[tokio::test]
async fn test_paging_over_twenty_five_rows() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add_range(&create_test_users(25)).await.unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 25);

    let first = users
        .get_paged(PaginationParams::new(1, 10), ListQuery::new())
        .await
        .unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 25);
    assert_eq!(first.total_pages, 3);
    assert!(first.has_next);
    assert!(!first.has_prev);

    let third = users
        .get_paged(PaginationParams::new(3, 10), ListQuery::new())
        .await
        .unwrap();
    assert_eq!(third.items.len(), 5);
    assert!(!third.has_next);

    let fourth = users
        .get_paged(PaginationParams::new(4, 10), ListQuery::new())
        .await
        .unwrap();
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.total, 25);
    uow.dispose().await.unwrap();
}

#[tokio::test]
async fn test_pages_do_not_overlap() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add_range(&create_test_users(12)).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = users
            .get_paged(PaginationParams::new(page, 5), ListQuery::new())
            .await
            .unwrap();
        seen.extend(result.items.into_iter().map(|u| u.id));
    }
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(total, 12);
    assert_eq!(seen.len(), 12);
}

#[tokio::test]
async fn test_paging_clamps_parameters() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();

    let page = uow
        .users()
        .unwrap()
        .get_paged(
            PaginationParams {
                page: 0,
                per_page: 500,
            },
            ListQuery::new(),
        )
        .await
        .unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 100);
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_update_with_empty_key_stages_nothing() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();
    let users = uow.users().unwrap();

    let mut keyless = UserBuilder::new().with_id("").build();
    let err = users.update(&mut keyless).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(err.to_string().contains("Key property 'id'"));

    let blank = UserBuilder::new().with_id("   ").build();
    assert!(matches!(
        users.add(&blank).await.unwrap_err(),
        Error::InvalidArgument(_)
    ));

    assert_eq!(uow.save_changes().await.unwrap(), 0);
    assert_eq!(db.row_count("users").await.unwrap(), 0);
}

#[tokio::test]
async fn test_integer_key_must_be_set() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();

    let role = SystemRole::new(0, "Nobody");
    let err = uow
        .repository::<SystemRole>()
        .unwrap()
        .add(&role)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn test_invalid_entity_rejected_before_staging() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();

    let user = UserBuilder::new().with_email("not-an-email").build();
    let err = uow.users().unwrap().add(&user).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(uow.save_changes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_stamps_and_persists() {
    let db = TestDatabase::new().await.unwrap();
    let mut user = create_test_user();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add(&user).await.unwrap();
    uow.save_changes().await.unwrap();

    let before = user.audit.updated_at;
    user.name = "Renamed".to_string();
    users.update(&mut user).await.unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 1);

    assert!(user.audit.updated_at >= before);
    assert_eq!(user.audit.updated_by.as_deref(), Some("test-runner"));

    let fetched = users.get_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Renamed");
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();

    let mut never_added = create_test_user();
    let err = uow.users().unwrap().update(&mut never_added).await.unwrap_err();
    match &err {
        Error::NotFound { entity, key } => {
            assert_eq!(*entity, "User");
            assert_eq!(key, &never_added.id);
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(err.to_string().contains(&never_added.id));
}

#[tokio::test]
async fn test_soft_delete_by_key() {
    let db = TestDatabase::new().await.unwrap();
    let user = create_test_user();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add(&user).await.unwrap();
    uow.save_changes().await.unwrap();

    users.soft_delete(&user.id).await.unwrap();
    uow.save_changes().await.unwrap();

    assert!(users.get_by_id(&user.id).await.unwrap().is_none());
    let stored = users
        .get_by_id_including_deleted(&user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.audit.is_deleted);
    assert_eq!(stored.audit.updated_by.as_deref(), Some("test-runner"));

    let err = users.soft_delete(&new_id()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_stale_update_cannot_restore_deleted_row() {
    let db = TestDatabase::new().await.unwrap();
    let user = create_test_user();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add(&user).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut stale = users.get_by_id(&user.id).await.unwrap().unwrap();
    users.soft_delete(&user.id).await.unwrap();
    uow.save_changes().await.unwrap();

    stale.name = "Resurrected".to_string();
    let err = users.update(&mut stale).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(uow.save_changes().await.unwrap(), 0);

    assert!(!users.exists(&user.id).await.unwrap());
    assert!(users.get_all(ListQuery::new()).await.unwrap().is_empty());
    let stored = users
        .get_by_id_including_deleted(&user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.audit.is_deleted);
    assert_ne!(stored.name, "Resurrected");

    let err = users.remove(&mut stale).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    // deleting again by key is accepted
    users.soft_delete(&user.id).await.unwrap();
    uow.dispose().await.unwrap();
}

#[tokio::test]
async fn test_update_range_fails_when_any_row_deleted() {
    let db = TestDatabase::new().await.unwrap();
    let mut batch = create_test_users(2);

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add_range(&batch).await.unwrap();
    uow.save_changes().await.unwrap();

    users.soft_delete(&batch[1].id).await.unwrap();
    uow.save_changes().await.unwrap();

    batch[0].name = "Renamed".to_string();
    let err = users.update_range(&mut batch).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(uow.save_changes().await.unwrap(), 0);

    let first = users.get_by_id(&batch[0].id).await.unwrap().unwrap();
    assert_ne!(first.name, "Renamed");
    uow.dispose().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_key_fails_at_store() {
    let db = TestDatabase::new().await.unwrap();
    let user = create_test_user();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add(&user).await.unwrap();
    uow.save_changes().await.unwrap();

    let twin = UserBuilder::new()
        .with_id(user.id.clone())
        .with_email("twin@example.com")
        .build();
    let err = users.add(&twin).await.unwrap_err();
    assert!(err.is_unique_violation());

    let same_email = UserBuilder::new().with_email(user.email.clone()).build();
    assert!(users.add(&same_email).await.unwrap_err().is_unique_violation());
}

#[tokio::test]
async fn test_add_range_is_all_or_nothing() {
    let db = TestDatabase::new().await.unwrap();
    let existing = create_test_user();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add(&existing).await.unwrap();
    uow.save_changes().await.unwrap();

    let batch = vec![
        create_test_user(),
        create_test_user(),
        UserBuilder::new()
            .with_id(existing.id.clone())
            .with_email("clash@example.com")
            .build(),
    ];
    assert!(users.add_range(&batch).await.unwrap_err().is_unique_violation());
    assert_eq!(uow.save_changes().await.unwrap(), 0);
    uow.dispose().await.unwrap();

    assert_eq!(db.row_count("users").await.unwrap(), 1);
}

#[tokio::test]
async fn test_add_range_rejects_empty_batch() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();
    let err = uow.users().unwrap().add_range(&[]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn test_update_range_and_remove_range() {
    let db = TestDatabase::new().await.unwrap();
    let mut batch = create_test_users(3);

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add_range(&batch).await.unwrap();
    uow.save_changes().await.unwrap();

    for user in batch.iter_mut() {
        user.phone_number = Some("+966511111111".to_string());
    }
    users.update_range(&mut batch).await.unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 3);
    assert_eq!(
        users
            .count(ListQuery::new().filter(Filter::eq("phone_number", "+966511111111")))
            .await
            .unwrap(),
        3
    );

    users.remove_range(&mut batch[..2]).await.unwrap();
    uow.save_changes().await.unwrap();
    assert_eq!(users.count(ListQuery::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_range_missing_row_rolls_back_batch() {
    let db = TestDatabase::new().await.unwrap();
    let stored = create_test_user();

    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users.add(&stored).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut renamed = stored.clone();
    renamed.name = "Changed".to_string();
    let mut batch = vec![renamed, create_test_user()];
    let err = users.update_range(&mut batch).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(uow.save_changes().await.unwrap(), 0);

    let fetched = users.get_by_id(&stored.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, stored.name);
}

#[tokio::test]
async fn test_filters_and_sorting() {
    let db = TestDatabase::new().await.unwrap();
    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    users
        .add_range(&[
            UserBuilder::new().with_name("Sara").build(),
            UserBuilder::new().with_name("Omar").admin().build(),
            UserBuilder::new().with_name("Nasser").with_phone("+966522222222").build(),
        ])
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    let found = users.find(Filter::contains("name", "SAR")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Sara");

    let admins = users
        .find(Filter::eq("system_role_id", system_roles::ADMIN))
        .await
        .unwrap();
    assert_eq!(admins.len(), 1);

    let either = users
        .find(Filter::or(vec![
            Filter::contains("name", "omar"),
            Filter::is_not_null("phone_number"),
        ]))
        .await
        .unwrap();
    assert_eq!(either.len(), 2);

    let sorted = users
        .get_all(ListQuery::new().sort(SortParams::new("name", SortDirection::Asc)))
        .await
        .unwrap();
    let names: Vec<_> = sorted.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Nasser", "Omar", "Sara"]);

    let err = users.find(Filter::eq("salary", 1)).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn test_load_related() {
    let db = TestDatabase::new().await.unwrap();
    let facility = db.seed_facility().await.unwrap();

    let member = UserBuilder::new().build();
    let membership = FacilityUser::new(
        member.id.clone(),
        facility.user_id.clone(),
        facility_roles::MEMBER,
    );

    let uow = db.unit_of_work();
    uow.users().unwrap().add(&member).await.unwrap();
    uow.repository::<FacilityUser>()
        .unwrap()
        .add(&membership)
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    let members = uow
        .repository::<Facility>()
        .unwrap()
        .load_related::<FacilityUser>(&facility)
        .await
        .unwrap();
    assert_eq!(members, vec![membership]);

    let staff_role = uow
        .repository::<SystemRole>()
        .unwrap()
        .get_by_id(&system_roles::STAFF)
        .await
        .unwrap()
        .expect("seeded role");
    let staff = uow
        .repository::<SystemRole>()
        .unwrap()
        .load_related::<User>(&staff_role)
        .await
        .unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0].id, member.id);
}

#[tokio::test]
async fn test_enumerations_and_amounts_round_trip() {
    let db = TestDatabase::new().await.unwrap();
    let facility = db.seed_facility().await.unwrap();
    let plan = SubscriptionPlanBuilder::new().with_pricing(1200).build();
    let subscription = SubscriptionBuilder::new(facility.user_id.clone(), plan.id.clone())
        .with_status(SubscriptionStatus::Pending)
        .with_amount(1200.5)
        .build();
    let payment = SubscriptionBuilder::payment_for(&subscription, PaymentMethod::BankTransfer);

    let uow = db.unit_of_work();
    uow.subscription_plans().unwrap().add(&plan).await.unwrap();
    uow.repository::<Subscription>()
        .unwrap()
        .add(&subscription)
        .await
        .unwrap();
    uow.repository::<Payment>().unwrap().add(&payment).await.unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 3);

    let stored = uow
        .repository::<Subscription>()
        .unwrap()
        .get_by_id(&subscription.id)
        .await
        .unwrap();
    assert_eq!(stored, Some(subscription.clone()));

    let payments = uow
        .repository::<Subscription>()
        .unwrap()
        .load_related::<Payment>(&subscription)
        .await
        .unwrap();
    assert_eq!(payments, vec![payment]);
}
