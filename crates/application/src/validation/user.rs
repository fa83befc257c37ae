//! User account requests

use super::{Validatable, ValidationResult, ValidationRules, ValidatorExt, MAX_NAME_LENGTH};
use crate::audit::{AuditStamp, Auditable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Checks shared by every request that creates a person's account.
pub(crate) fn validate_person(
    name: &str,
    arabic_name: Option<&str>,
    email: &str,
    phone: Option<&str>,
) -> ValidationResult {
    let mut result = ValidationRules::validate_length(name, "name", Some(1), Some(MAX_NAME_LENGTH));
    result.merge(ValidationRules::validate_optional_length(
        arabic_name,
        "arabic_name",
        MAX_NAME_LENGTH,
    ));
    result.merge(ValidationRules::validate_email("email", email));
    if let Some(phone) = phone {
        result.merge(ValidationRules::validate_phone("phone_number", phone));
    }
    result
}

/// Create a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub arabic_name: Option<String>,
    pub email: String,
    pub password: String,
    pub system_role_id: i32,
    pub phone_number: Option<String>,
    #[serde(skip)]
    pub audit: AuditStamp,
}

impl Validatable for CreateUserRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = validate_person(
            &self.name,
            self.arabic_name.as_deref(),
            &self.email,
            self.phone_number.as_deref(),
        );

        if self.system_role_id <= 0 {
            result.add_field_error("system_role_id", "Must reference a system role");
        }

        result
    }
}

impl Auditable for CreateUserRequest {
    fn audit_stamp(&self) -> &AuditStamp {
        &self.audit
    }

    fn audit_stamp_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Replace a user's profile; a missing password keeps the stored one
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: String,
    pub name: String,
    pub arabic_name: Option<String>,
    pub email: String,
    pub password: Option<String>,
    pub system_role_id: i32,
    pub phone_number: Option<String>,
}

impl Validatable for UpdateUserRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = ValidationRules::validate_key(&self.id, "id");
        result.merge(validate_person(
            &self.name,
            self.arabic_name.as_deref(),
            &self.email,
            self.phone_number.as_deref(),
        ));

        if self.system_role_id <= 0 {
            result.add_field_error("system_role_id", "Must reference a system role");
        }

        result
    }
}

/// Filtered, sorted, paged user listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    #[validate(range(min = 1, message = "Must reference a system role"))]
    pub role_id: Option<i32>,
    /// Case-insensitive search over name, e-mail, phone and Arabic name
    #[validate(length(max = 200, message = "Search text must be 200 characters or less"))]
    pub free_text: Option<String>,
    pub sort_by: Option<String>,
    /// "asc" or "desc"; anything else sorts ascending
    pub sort_direction: Option<String>,
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_number() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl Default for ListUsersRequest {
    fn default() -> Self {
        Self {
            role_id: None,
            free_text: None,
            sort_by: None,
            sort_direction: None,
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

impl Validatable for ListUsersRequest {
    fn validate_all(&self) -> ValidationResult {
        self.to_validation_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateUserRequest {
        CreateUserRequest {
            name: "Amal Saleh".to_string(),
            arabic_name: Some("أمل صالح".to_string()),
            email: "amal@example.com".to_string(),
            password: "s3cretpass".to_string(),
            system_role_id: 2,
            phone_number: Some("+966512345678".to_string()),
            audit: AuditStamp::default(),
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create_request().validate_all().valid);
    }

    #[test]
    fn test_create_request_collects_all_errors() {
        let mut request = create_request();
        request.name = String::new();
        request.email = "not-an-email".to_string();
        request.system_role_id = 0;

        let result = request.validate_all();
        assert!(!result.valid);
        assert!(result.field_errors.contains_key("name"));
        assert!(result.field_errors.contains_key("email"));
        assert!(result.field_errors.contains_key("system_role_id"));
    }

    #[test]
    fn test_update_request_requires_id() {
        let request = UpdateUserRequest {
            id: " ".to_string(),
            name: "Amal".to_string(),
            arabic_name: None,
            email: "amal@example.com".to_string(),
            password: None,
            system_role_id: 2,
            phone_number: None,
        };
        assert!(request.validate_all().field_errors.contains_key("id"));
    }

    #[test]
    fn test_list_request_defaults_and_derive_rules() {
        let request: ListUsersRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.page_number, 1);
        assert_eq!(request.page_size, 10);
        assert!(request.validate_all().valid);

        let request = ListUsersRequest {
            role_id: Some(0),
            free_text: Some("x".repeat(201)),
            ..Default::default()
        };
        let result = request.validate_all();
        assert!(result.field_errors.contains_key("role_id"));
        assert!(result.field_errors.contains_key("free_text"));
    }

    #[test]
    fn test_audit_stamp_is_not_deserialized() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@example.com","password":"pw12345678","systemRoleId":2,
                "audit":{"createdBy":"spoofed"}}"#,
        )
        .unwrap();
        assert_eq!(request.audit.created_by, "");
    }
}
