//! User data models and DTOs.
//!
//! # Core Types
//!
//! - [`User`] - base user entity, never carries the password digest
//! - [`UserWithSchool`] - user with the referenced school's display fields
//! - [`UserRole`] - the closed five-member role set
//!
//! # Request DTOs
//!
//! - [`CreateUserDto`] / [`UpdateUserDto`] - write payloads
//! - [`UserFilterParams`] - query parameters for list lookups

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::validator::{validate_eiin, validate_phone};

/// Roles a user can hold. Closed set: any other value is rejected at the
/// JSON boundary and again by the `user_role` column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    #[serde(rename = "Super Admin")]
    #[sqlx(rename = "Super Admin")]
    SuperAdmin,
    #[sqlx(rename = "Admin")]
    Admin,
    #[sqlx(rename = "Operator")]
    Operator,
    #[sqlx(rename = "Teacher")]
    Teacher,
    #[sqlx(rename = "Parent")]
    Parent,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Admin => "Admin",
            Self::Operator => "Operator",
            Self::Teacher => "Teacher",
            Self::Parent => "Parent",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Super Admin" => Ok(Self::SuperAdmin),
            "Admin" => Ok(Self::Admin),
            "Operator" => Ok(Self::Operator),
            "Teacher" => Ok(Self::Teacher),
            "Parent" => Ok(Self::Parent),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// A user in the system.
///
/// The password digest lives only in the database and in private query
/// structs inside the service; it never appears on this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub eiin: String,
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub number: Option<String>,
    pub photo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display fields of the referenced school, joined into user reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SchoolInfo {
    pub name: String,
    pub email: Option<String>,
    pub number: Option<String>,
    pub address: Option<String>,
}

/// A user together with the referenced school's display fields.
///
/// `school` is `None` when the reference dangles (the school was deleted
/// between the existence check and a later read).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithSchool {
    pub user: User,
    pub school: Option<SchoolInfo>,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(
        length(min = 1, max = 20, message = "EIIN cannot exceed 20 characters"),
        custom(function = validate_eiin)
    )]
    pub eiin: String,
    pub role: UserRole,
    #[validate(length(min = 1, max = 100, message = "Name cannot exceed 100 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(custom(function = validate_phone))]
    pub number: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub photo: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// DTO for updating a user. Only provided fields are applied; a provided
/// EIIN is re-checked against existing schools, a provided password is
/// re-hashed only if its value actually changed.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(
        length(min = 1, max = 20, message = "EIIN cannot exceed 20 characters"),
        custom(function = validate_eiin)
    )]
    pub eiin: Option<String>,
    pub role: Option<UserRole>,
    #[validate(length(min = 1, max = 100, message = "Name cannot exceed 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = validate_phone))]
    pub number: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub photo: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for user lookups. Filters are mutually exclusive;
/// `email` wins over `eiin`, which wins over `role`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// Return the single user with this email.
    pub email: Option<String>,
    /// Return all users of the school with this EIIN.
    pub eiin: Option<String>,
    /// Return all users holding this role.
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serde_uses_display_names() {
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            "\"Super Admin\""
        );
        assert_eq!(serde_json::to_string(&UserRole::Teacher).unwrap(), "\"Teacher\"");

        let parsed: UserRole = serde_json::from_str("\"Super Admin\"").unwrap();
        assert_eq!(parsed, UserRole::SuperAdmin);
    }

    #[test]
    fn role_rejects_unknown_value() {
        assert!(serde_json::from_str::<UserRole>("\"Janitor\"").is_err());
        assert!("Janitor".parse::<UserRole>().is_err());
    }

    #[test]
    fn role_from_str_roundtrip() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::Operator,
            UserRole::Teacher,
            UserRole::Parent,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn create_dto_defaults_to_active() {
        let dto: CreateUserDto = serde_json::from_value(serde_json::json!({
            "eiin": "123456",
            "role": "Teacher",
            "name": "A. Rahman",
            "email": "a@x.com",
            "password": "secret1"
        }))
        .unwrap();

        assert!(dto.is_active);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn short_password_fails_validation() {
        let dto: CreateUserDto = serde_json::from_value(serde_json::json!({
            "eiin": "123456",
            "role": "Teacher",
            "name": "A. Rahman",
            "email": "a@x.com",
            "password": "five5"
        }))
        .unwrap();

        assert!(dto.validate().is_err());
    }

    #[test]
    fn user_json_never_exposes_a_password_field() {
        let user = User {
            id: Uuid::new_v4(),
            eiin: "123456".to_string(),
            role: UserRole::Parent,
            name: "A. Rahman".to_string(),
            email: "a@x.com".to_string(),
            number: None,
            photo: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let body = serde_json::to_value(&user).unwrap();
        assert!(body.get("password").is_none());
    }
}
