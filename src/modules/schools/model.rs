//! School data models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::validator::{validate_eiin, validate_phone};

/// A school record.
///
/// `id` is the storage identity; `eiin` is the business identifier users
/// reference. EIIN is immutable once created — [`UpdateSchoolDto`] carries
/// no field for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct School {
    pub id: Uuid,
    pub eiin: String,
    pub name: String,
    pub logo: Option<String>,
    pub email: Option<String>,
    pub number: Option<String>,
    pub address: Option<String>,
    pub package_validity: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new school.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolDto {
    #[validate(
        length(min = 1, max = 20, message = "EIIN cannot exceed 20 characters"),
        custom(function = validate_eiin)
    )]
    pub eiin: String,
    #[validate(length(min = 1, max = 100, message = "School name cannot exceed 100 characters"))]
    pub name: String,
    pub logo: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = validate_phone))]
    pub number: Option<String>,
    #[validate(length(max = 500, message = "Address cannot exceed 500 characters"))]
    pub address: Option<String>,
    pub package_validity: NaiveDate,
}

/// DTO for updating a school. Only provided fields are applied.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSchoolDto {
    #[validate(length(min = 1, max = 100, message = "School name cannot exceed 100 characters"))]
    pub name: Option<String>,
    pub logo: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = validate_phone))]
    pub number: Option<String>,
    #[validate(length(max = 500, message = "Address cannot exceed 500 characters"))]
    pub address: Option<String>,
    pub package_validity: Option<NaiveDate>,
}

/// Query parameters for school lookups.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SchoolFilterParams {
    /// Return the single school with this EIIN instead of the full list.
    pub eiin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateSchoolDto {
        CreateSchoolDto {
            eiin: "123456".to_string(),
            name: "Greenwood High".to_string(),
            logo: None,
            email: Some("info@greenwood.edu".to_string()),
            number: Some("+8801712345678".to_string()),
            address: Some("12 Hill Road".to_string()),
            package_validity: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        }
    }

    #[test]
    fn valid_school_passes_validation() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn eiin_with_letters_fails() {
        let mut dto = valid_dto();
        dto.eiin = "12ab56".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn eiin_over_20_chars_fails() {
        let mut dto = valid_dto();
        dto.eiin = "1".repeat(21);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn name_over_100_chars_fails() {
        let mut dto = valid_dto();
        dto.name = "x".repeat(101);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn bad_email_fails() {
        let mut dto = valid_dto();
        dto.email = Some("not-an-email".to_string());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn address_over_500_chars_fails() {
        let mut dto = valid_dto();
        dto.address = Some("x".repeat(501));
        assert!(dto.validate().is_err());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let dto = CreateSchoolDto {
            eiin: "654321".to_string(),
            name: "Riverside".to_string(),
            logo: None,
            email: None,
            number: None,
            address: None,
            package_validity: NaiveDate::from_ymd_opt(2027, 6, 30).unwrap(),
        };
        assert!(dto.validate().is_ok());
    }
}
