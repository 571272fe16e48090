use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

pub fn create_session_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.session_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create session token: {}", e)))
}

pub fn verify_session_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired session token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            session_expiry: 1800,
        }
    }

    #[test]
    fn create_and_verify_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token =
            create_session_token(user_id, "a@x.com", UserRole::Teacher, &config).unwrap();
        let claims = verify_session_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, UserRole::Teacher);
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let config = test_config();
        let token =
            create_session_token(Uuid::new_v4(), "a@x.com", UserRole::Admin, &config).unwrap();

        let other = JwtConfig {
            secret: "other-secret".to_string(),
            session_expiry: 1800,
        };
        assert!(verify_session_token(&token, &other).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(verify_session_token("not-a-token", &test_config()).is_err());
    }
}
