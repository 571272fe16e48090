use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{
    CreateUserDto, UpdateUserDto, UserFilterParams, UserRole, UserWithSchool,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created successfully", body = UserWithSchool),
        (status = 400, description = "Validation error or invalid role"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already exists, or the EIIN names no school")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserWithSchool>>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user, "User created successfully")),
    ))
}

/// List users, with optional email/eiin/role filters
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "List of users (single user when ?email= is given)", body = Vec<UserWithSchool>),
        (status = 400, description = "Invalid role filter"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No user with the given email")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(filters): Query<UserFilterParams>,
) -> Result<Response, AppError> {
    if let Some(email) = &filters.email {
        let user = UserService::find_user_by_email(&state.db, email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        return Ok(Json(ApiResponse::new(user)).into_response());
    }

    let users = if let Some(eiin) = &filters.eiin {
        UserService::find_users_by_eiin(&state.db, eiin).await?
    } else if let Some(role) = &filters.role {
        let role = role
            .parse::<UserRole>()
            .map_err(|_| AppError::InvalidRole("Invalid role provided".to_string()))?;
        UserService::find_users_by_role(&state.db, role).await?
    } else {
        UserService::get_all_users(&state.db).await?
    };

    Ok(Json(ApiResponse::new(users)).into_response())
}

/// Get the current session's identity
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Session identity", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(auth_user))]
pub async fn get_profile(auth_user: AuthUser) -> Json<ApiResponse<ProfileResponse>> {
    Json(ApiResponse::new(ProfileResponse {
        user_id: auth_user.0.sub,
        email: auth_user.0.email,
        role: auth_user.0.role,
    }))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User with school fields joined", body = UserWithSchool),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserWithSchool>>, AppError> {
    let user = UserService::find_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(ApiResponse::new(user)))
}

/// Update a user (partial merge)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated successfully", body = UserWithSchool),
        (status = 400, description = "Validation error or invalid role"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already exists, or the EIIN names no school")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<UserWithSchool>>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message(
        user,
        "User updated successfully",
    )))
}

/// Deactivate a user (soft delete)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deactivated", body = UserWithSchool),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserWithSchool>>, AppError> {
    let user = UserService::deactivate_user(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message(
        user,
        "User deactivated successfully",
    )))
}

/// Permanently delete a user (hard delete)
#[utoipa::path(
    delete,
    path = "/api/users/{id}/permanent",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User permanently deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn purge_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    UserService::purge_user(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message(
        (),
        "User permanently deleted",
    )))
}
