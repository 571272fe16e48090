use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::schools::model::{CreateSchoolDto, School, SchoolFilterParams, UpdateSchoolDto};
use crate::modules::schools::service::SchoolService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

/// Create a new school
#[utoipa::path(
    post,
    path = "/api/schools",
    request_body = CreateSchoolDto,
    responses(
        (status = 201, description = "School created successfully", body = School),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "School with this EIIN already exists")
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_school(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSchoolDto>,
) -> Result<(StatusCode, Json<ApiResponse<School>>), AppError> {
    let school = SchoolService::create_school(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            school,
            "School created successfully",
        )),
    ))
}

/// List schools, or look one up by EIIN
#[utoipa::path(
    get,
    path = "/api/schools",
    params(SchoolFilterParams),
    responses(
        (status = 200, description = "List of schools, or a single school when ?eiin= is given", body = Vec<School>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No school with the given EIIN")
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_schools(
    State(state): State<AppState>,
    Query(filters): Query<SchoolFilterParams>,
) -> Result<Response, AppError> {
    if let Some(eiin) = &filters.eiin {
        let school = SchoolService::find_school_by_eiin(&state.db, eiin)
            .await?
            .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;
        return Ok(Json(ApiResponse::new(school)).into_response());
    }

    let schools = SchoolService::get_all_schools(&state.db).await?;
    Ok(Json(ApiResponse::new(schools)).into_response())
}

/// Get a school by id
#[utoipa::path(
    get,
    path = "/api/schools/{id}",
    params(("id" = Uuid, Path, description = "School id")),
    responses(
        (status = 200, description = "School details", body = School),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "School not found")
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_school(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<School>>, AppError> {
    let school = SchoolService::get_school_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;
    Ok(Json(ApiResponse::new(school)))
}

/// Update a school (partial merge; EIIN is immutable)
#[utoipa::path(
    put,
    path = "/api/schools/{id}",
    params(("id" = Uuid, Path, description = "School id")),
    request_body = UpdateSchoolDto,
    responses(
        (status = 200, description = "School updated successfully", body = School),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "School not found")
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_school(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSchoolDto>,
) -> Result<Json<ApiResponse<School>>, AppError> {
    let school = SchoolService::update_school(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message(
        school,
        "School updated successfully",
    )))
}

/// Delete a school permanently
#[utoipa::path(
    delete,
    path = "/api/schools/{id}",
    params(("id" = Uuid, Path, description = "School id")),
    responses(
        (status = 200, description = "School deleted; referencing users deactivated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "School not found")
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_school(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    SchoolService::delete_school(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message(
        (),
        "School deleted successfully",
    )))
}
