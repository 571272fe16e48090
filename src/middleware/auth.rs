use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_session_token;

/// Extractor that validates the Bearer session token.
///
/// Possession of a valid session is the only gate; the system carries a
/// role on every user but enforces no per-role authorization.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the session's user id as a UUID.
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in session token".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_session_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Route-layer guard: rejects the request unless a valid session token is
/// present, then exposes the claims to handlers via request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::model::UserRole;
    use uuid::Uuid;

    #[test]
    fn user_id_parses_valid_uuid() {
        let id = Uuid::new_v4();
        let auth_user = AuthUser(Claims {
            sub: id.to_string(),
            email: "a@x.com".to_string(),
            role: UserRole::Admin,
            exp: 9999999999,
            iat: 1234567890,
        });

        assert_eq!(auth_user.user_id().unwrap(), id);
        assert_eq!(auth_user.email(), "a@x.com");
    }

    #[test]
    fn user_id_rejects_garbage_sub() {
        let auth_user = AuthUser(Claims {
            sub: "not-a-uuid".to_string(),
            email: "a@x.com".to_string(),
            role: UserRole::Parent,
            exp: 9999999999,
            iat: 1234567890,
        });

        assert!(auth_user.user_id().is_err());
    }
}
