//! API request and response types
//!
//! The wire format is camelCase JSON. Every successful response carries
//! `success: true`; failures use the error envelope defined by the
//! backend's error module.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_new_password, validate_password};

// ============================================================================
// User / session types
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    #[validate(url(message = "Invalid image URL format"))]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "Designation must not be empty"))]
    pub designation: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
}

/// Logout request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Profile patch; omitted fields retain their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(url(message = "Invalid image URL format"))]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "Designation must not be empty"))]
    pub designation: Option<String>,
}

/// Change-password request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(custom(function = validate_password))]
    pub old_password: String,
    #[validate(custom(function = validate_new_password))]
    pub new_password: String,
}

/// Self-deletion request; both fields must match the stored record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
}

/// Public projection of a user record; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

/// Listing projection returned by the all-users endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

/// Response for register, login and change-password
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub access_token: String,
    pub user: PublicUser,
}

/// Response for the refresh-token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub success: bool,
    pub access_token: String,
}

/// Response carrying a single public user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub success: bool,
    pub user: PublicUser,
}

/// Response for the all-users endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserSummary>,
}

/// Generic success envelope with a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Generic success envelope with a human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Entity payloads (one per administrative entity)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub date: DateTime<Utc>,
    #[validate(range(min = 0, message = "Valid views count is required"))]
    pub views: i32,
    #[validate(range(min = 0, message = "Valid comments count is required"))]
    pub comments: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    #[validate(length(min = 1, message = "Course name is required"))]
    pub course_name: String,
    #[validate(length(min = 1, message = "Instructor is required"))]
    pub instructor: String,
    #[validate(range(min = 1, message = "Valid duration is required"))]
    pub duration: i32,
    #[validate(range(min = 0, message = "Valid enrollment count is required"))]
    pub enrollment_count: i32,
    #[validate(length(min = 1, message = "Price is required"))]
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    pub join_date: NaiveDate,
    #[validate(length(min = 1, message = "Salary is required"))]
    pub salary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SchoolPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 0, message = "Valid student count is required"))]
    pub students: i32,
    #[validate(range(min = 0, message = "Valid teacher count is required"))]
    pub teachers: i32,
    #[validate(range(min = 1000, max = 9999, message = "Valid founding year is required"))]
    pub founded_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 150, message = "Valid age is required"))]
    pub age: i32,
    #[validate(length(min = 1, message = "Class name is required"))]
    pub class_name: String,
    pub admission_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Qualification is required"))]
    pub qualification: String,
    #[validate(range(min = 0, message = "Valid experience is required"))]
    pub experience: i32,
    #[validate(length(min = 1, message = "Contact info is required"))]
    pub contact_info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            role: "admin".to_string(),
            image: None,
            designation: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        let req = RegisterRequest {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            role: "admin".to_string(),
            image: Some("https://example.com/a.png".to_string()),
            designation: Some("Principal".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_change_password_enforces_new_password_length() {
        let req = ChangePasswordRequest {
            old_password: "secret1".to_string(),
            new_password: "short".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_auth_response_uses_camel_case() {
        let resp = AuthResponse {
            success: true,
            access_token: "tok".to_string(),
            user: PublicUser {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                role: "admin".to_string(),
                image: None,
                designation: None,
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("access_token").is_none());
    }

    #[test]
    fn test_public_user_omits_absent_optionals() {
        let user = PublicUser {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            role: "admin".to_string(),
            image: None,
            designation: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("image").is_none());
        assert!(json.get("designation").is_none());
    }

    #[test]
    fn test_course_payload_field_names() {
        let json = serde_json::json!({
            "courseName": "Algebra",
            "instructor": "Ada",
            "duration": 12,
            "enrollmentCount": 30,
            "price": "99.00"
        });
        let payload: CoursePayload = serde_json::from_value(json).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.course_name, "Algebra");
    }
}
