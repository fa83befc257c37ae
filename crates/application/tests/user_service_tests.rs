//! Tests for the user service
//!
//! Each test runs against its own migrated SQLite database.

use accredigo_application::validation::{CreateUserRequest, ListUsersRequest, UpdateUserRequest};
use accredigo_application::{ApplicationError, AuditStamp, RequestContext, ServiceConfig, UserService};
use accredigo_common::verify_password;
use accredigo_domain::identifiers::system_roles;
use accredigo_infrastructure::Repository;
use accredigo_testing::{builders::UserBuilder, TestDatabase};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

fn service(db: &TestDatabase) -> UserService {
    UserService::new(db.pool().clone(), ServiceConfig::default())
}

fn admin() -> RequestContext {
    RequestContext::authenticated("admin-1")
        .with_role(system_roles::ADMIN)
        .with_forwarded_for("203.0.113.5")
}

fn create_request(email: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: "Amal Saleh".to_string(),
        arabic_name: None,
        email: email.to_string(),
        password: "s3cretpass".to_string(),
        system_role_id: system_roles::STAFF,
        phone_number: Some("+966512345678".to_string()),
        audit: AuditStamp::default(),
    }
}

async fn seed_users(db: &TestDatabase) {
    let uow = db.unit_of_work();
    let users = uow.users().unwrap();
    for (name, email, role) in [
        ("Basma", "basma@clinic.sa", system_roles::STAFF),
        ("Adel", "adel@hospital.sa", system_roles::FACILITY),
        ("Dana", "dana@clinic.sa", system_roles::STAFF),
        ("Caleb", "caleb@example.com", system_roles::EXPLORE),
        ("Emad", "emad@hospital.sa", system_roles::STAFF),
    ] {
        let user = UserBuilder::new()
            .with_name(name)
            .with_email(email)
            .with_role(role)
            .build();
        users.add(&user).await.unwrap();
    }
    uow.save_changes().await.unwrap();
    uow.dispose().await.unwrap();
}

#[tokio::test]
async fn test_create_user_hashes_password_and_stamps_creator() {
    let db = TestDatabase::new().await.unwrap();
    let dto = service(&db).create(&admin(), create_request("Amal@Example.com")).await.unwrap();

    assert_eq!(dto.email, "amal@example.com");
    assert!(!dto.id.is_empty());

    let uow = db.unit_of_work();
    let stored = uow.users().unwrap().get_by_id(&dto.id).await.unwrap().unwrap();
    assert!(stored.password.starts_with("$argon2"));
    assert!(verify_password("s3cretpass", &stored.password).unwrap());
    assert_eq!(stored.audit.created_by.as_deref(), Some("admin-1"));
}

#[tokio::test]
async fn test_create_user_duplicate_email_conflicts() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);
    users.create(&admin(), create_request("amal@example.com")).await.unwrap();

    let err = users
        .create(&admin(), create_request("AMAL@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Conflict(_)));
    assert_eq!(db.row_count("users").await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_user_invalid_request_writes_nothing() {
    let db = TestDatabase::new().await.unwrap();
    let mut request = create_request("not-an-email");
    request.password = "short".to_string();

    let err = service(&db).create(&admin(), request).await.unwrap_err();
    match err {
        ApplicationError::ValidationFailed(message) => {
            assert!(message.contains("email"));
            assert!(message.contains("password"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(db.row_count("users").await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let db = TestDatabase::new().await.unwrap();
    let err = service(&db).get_by_id(&admin(), "missing").await.unwrap_err();
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn test_list_filters_by_role_and_text() {
    let db = TestDatabase::new().await.unwrap();
    seed_users(&db).await;
    let users = service(&db);

    let staff = users
        .list(
            &admin(),
            ListUsersRequest {
                role_id: Some(system_roles::STAFF),
                sort_by: Some("name".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(staff.total, 3);
    let names: Vec<_> = staff.items.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Basma", "Dana", "Emad"]);

    let clinic = users
        .list(
            &admin(),
            ListUsersRequest {
                free_text: Some("  CLINIC ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(clinic.total, 2);
}

#[tokio::test]
async fn test_list_sorting_and_paging() {
    let db = TestDatabase::new().await.unwrap();
    seed_users(&db).await;
    let users = service(&db);

    let page = users
        .list(
            &admin(),
            ListUsersRequest {
                sort_by: Some("Name".to_string()),
                sort_direction: Some("desc".to_string()),
                page_number: 2,
                page_size: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Caleb", "Basma"]);
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);
    assert!(page.has_prev);

    // unknown sort fields fall back to newest first instead of failing
    let fallback = users
        .list(
            &admin(),
            ListUsersRequest {
                sort_by: Some("password".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(fallback.total, 5);
}

#[tokio::test]
async fn test_update_user_keeps_password_when_blank() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);
    let created = users.create(&admin(), create_request("amal@example.com")).await.unwrap();

    let updated = users
        .update(
            &admin(),
            UpdateUserRequest {
                id: created.id.clone(),
                name: "Amal S.".to_string(),
                arabic_name: Some("أمل".to_string()),
                email: "amal@example.com".to_string(),
                password: None,
                system_role_id: system_roles::ADMIN,
                phone_number: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Amal S.");
    assert_eq!(updated.system_role_id, system_roles::ADMIN);

    let uow = db.unit_of_work();
    let stored = uow.users().unwrap().get_by_id(&created.id).await.unwrap().unwrap();
    assert!(verify_password("s3cretpass", &stored.password).unwrap());
    assert_eq!(stored.audit.updated_by.as_deref(), Some("admin-1"));
}

#[tokio::test]
async fn test_update_to_taken_email_conflicts() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);
    users.create(&admin(), create_request("first@example.com")).await.unwrap();
    let second = users.create(&admin(), create_request("second@example.com")).await.unwrap();

    let err = users
        .update(
            &admin(),
            UpdateUserRequest {
                id: second.id,
                name: "Second".to_string(),
                arabic_name: None,
                email: "first@example.com".to_string(),
                password: None,
                system_role_id: system_roles::STAFF,
                phone_number: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Conflict(_)));
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let db = TestDatabase::new().await.unwrap();
    let err = service(&db)
        .update(
            &admin(),
            UpdateUserRequest {
                id: "missing".to_string(),
                name: "Nobody".to_string(),
                arabic_name: None,
                email: "nobody@example.com".to_string(),
                password: None,
                system_role_id: system_roles::STAFF,
                phone_number: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_is_soft() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);
    let created = users.create(&admin(), create_request("amal@example.com")).await.unwrap();

    users.delete(&admin(), &created.id).await.unwrap();

    assert!(matches!(
        users.get_by_id(&admin(), &created.id).await,
        Err(ApplicationError::NotFound(_))
    ));
    let listed = users.list(&admin(), ListUsersRequest::default()).await.unwrap();
    assert_eq!(listed.total, 0);
    assert_eq!(db.row_count("users").await.unwrap(), 1);

    // the address stays reserved by the deleted account
    let err = users
        .create(&admin(), create_request("amal@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Conflict(_)));
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let db = TestDatabase::new().await.unwrap();
    let err = service(&db).delete(&admin(), "missing").await.unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn test_created_users_are_all_listed() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);

    for i in 0..4 {
        let mut request = create_request(&format!("{i}.{}", SafeEmail().fake::<String>()));
        request.name = Name().fake();
        users.create(&admin(), request).await.unwrap();
    }

    let listed = users.list(&admin(), ListUsersRequest::default()).await.unwrap();
    assert_eq!(listed.total, 4);
    assert!(listed.items.iter().all(|u| u.email == u.email.to_lowercase()));
}

#[tokio::test]
async fn test_authenticate_accepts_matching_password() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);
    let created = users.create(&admin(), create_request("amal@example.com")).await.unwrap();

    let signed_in = users
        .authenticate(&RequestContext::anonymous(), " AMAL@example.com ", "s3cretpass")
        .await
        .unwrap();
    assert_eq!(signed_in.id, created.id);
}

#[tokio::test]
async fn test_authenticate_rejects_bad_credentials() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);
    let created = users.create(&admin(), create_request("amal@example.com")).await.unwrap();
    let anonymous = RequestContext::anonymous();

    let wrong = users
        .authenticate(&anonymous, "amal@example.com", "wrongpass1")
        .await
        .unwrap_err();
    assert!(matches!(wrong, ApplicationError::Unauthorized(_)));

    let unknown = users
        .authenticate(&anonymous, "nobody@example.com", "s3cretpass")
        .await
        .unwrap_err();
    assert_eq!(unknown.to_string(), wrong.to_string());

    users.delete(&admin(), &created.id).await.unwrap();
    let deleted = users
        .authenticate(&anonymous, "amal@example.com", "s3cretpass")
        .await
        .unwrap_err();
    assert!(matches!(deleted, ApplicationError::Unauthorized(_)));
}

#[tokio::test]
async fn test_update_with_whitespace_password_keeps_hash() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);
    let created = users.create(&admin(), create_request("amal@example.com")).await.unwrap();

    users
        .update(
            &admin(),
            UpdateUserRequest {
                id: created.id.clone(),
                name: "Amal Saleh".to_string(),
                arabic_name: None,
                email: "amal@example.com".to_string(),
                password: Some("   ".to_string()),
                system_role_id: system_roles::STAFF,
                phone_number: None,
            },
        )
        .await
        .unwrap();

    let uow = db.unit_of_work();
    let stored = uow.users().unwrap().get_by_id(&created.id).await.unwrap().unwrap();
    assert!(verify_password("s3cretpass", &stored.password).unwrap());
}
