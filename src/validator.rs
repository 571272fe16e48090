use std::borrow::Cow;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::utils::errors::AppError;

/// EIIN is a numeric business identifier: digits only, nothing else.
pub fn validate_eiin(eiin: &str) -> Result<(), ValidationError> {
    if eiin.is_empty() || !eiin.chars().all(|c| c.is_ascii_digit()) {
        let mut error = ValidationError::new("eiin");
        error.message = Some(Cow::from("EIIN must contain only numbers"));
        return Err(error);
    }
    Ok(())
}

/// Phone numbers: optional leading `+`, first digit nonzero, at most 16 digits.
pub fn validate_phone(number: &str) -> Result<(), ValidationError> {
    let digits = number.strip_prefix('+').unwrap_or(number);
    let valid = !digits.is_empty()
        && digits.len() <= 16
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit());

    if !valid {
        let mut error = ValidationError::new("phone");
        error.message = Some(Cow::from("Please enter a valid phone number"));
        return Err(error);
    }
    Ok(())
}

fn format_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().filter_map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .or_else(|| Some(format!("{} is invalid", field)))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON extractor that runs `validator` rules before the handler sees the
/// payload, so no write path ever starts with an invalid shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::Validation(format!("{} is required", field));
                }

                if error_msg.contains("unknown variant") {
                    return AppError::InvalidRole("Invalid role provided".to_string());
                }

                if error_msg.contains("invalid type") {
                    return AppError::Validation("Invalid field type in request".to_string());
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::Validation(
                        "Missing 'Content-Type: application/json' header".to_string(),
                    );
                }

                AppError::Validation("Invalid request body".to_string())
            })?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(format_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eiin_accepts_digits() {
        assert!(validate_eiin("123456").is_ok());
        assert!(validate_eiin("0").is_ok());
    }

    #[test]
    fn eiin_rejects_non_digits() {
        assert!(validate_eiin("").is_err());
        assert!(validate_eiin("12a456").is_err());
        assert!(validate_eiin("123 456").is_err());
        assert!(validate_eiin("-12345").is_err());
    }

    #[test]
    fn phone_accepts_plain_and_prefixed() {
        assert!(validate_phone("1712345678").is_ok());
        assert!(validate_phone("+8801712345678").is_ok());
    }

    #[test]
    fn phone_rejects_bad_shapes() {
        assert!(validate_phone("").is_err());
        assert!(validate_phone("+").is_err());
        assert!(validate_phone("0123").is_err());
        assert!(validate_phone("12345678901234567").is_err());
        assert!(validate_phone("+880-1712").is_err());
    }
}
