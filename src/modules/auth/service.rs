use sqlx::PgPool;
use tracing::{info, instrument};

use crate::config::jwt::JwtConfig;
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_session_token;

use super::model::{LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    /// Exchange verified credentials for a short-lived session token.
    #[instrument(skip(db, dto, jwt_config), fields(user.email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = UserService::authenticate(db, &dto.email, &dto.password)
            .await?
            .ok_or_else(|| {
                // Identical response for unknown email, inactive account,
                // and wrong password.
                AppError::Unauthorized("Invalid email or password".to_string())
            })?;

        let access_token =
            create_session_token(user.user.id, &user.user.email, user.user.role, jwt_config)?;

        info!(user.id = %user.user.id, "Login successful");

        Ok(LoginResponse {
            access_token,
            expires_in: jwt_config.session_expiry,
            user,
        })
    }
}
