use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::utils::response::ErrorResponse;

/// Application error taxonomy.
///
/// Every fallible service operation resolves to one of these kinds; the
/// HTTP layer maps them to status codes in [`AppError::status`]. A failed
/// credential check is deliberately NOT an error — `authenticate` returns
/// `None` so callers cannot tell which half of the credential was wrong.
#[derive(Debug, Error)]
pub enum AppError {
    /// A field failed a shape, length, or pattern rule.
    #[error("{0}")]
    Validation(String),

    /// A role value outside the closed five-member set.
    #[error("{0}")]
    InvalidRole(String),

    /// Uniqueness violation on a business key or email.
    #[error("{0}")]
    DuplicateKey(String),

    /// A user's school reference names no existing school.
    #[error("{0}")]
    ReferenceNotFound(String),

    /// An id did not resolve for a read, update, or delete.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid session.
    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidRole(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateKey(_) | Self::ReferenceNotFound(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::DuplicateKey(_) => "DUPLICATE_KEY",
            Self::ReferenceNotFound(_) => "REFERENCE_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Database(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal causes are logged, never echoed to the client.
        let message = match &self {
            Self::Database(e) => {
                error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            Self::Internal(e) => {
                error!(error = %e, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse::new(message, self.code());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_boundary_contract() {
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidRole("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateKey("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ReferenceNotFound("dangling".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("no".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(AppError::DuplicateKey("x".into()).code(), "DUPLICATE_KEY");
        assert_eq!(
            AppError::ReferenceNotFound("x".into()).code(),
            "REFERENCE_NOT_FOUND"
        );
        assert_eq!(AppError::NotFound("x".into()).code(), "NOT_FOUND");
    }
}
