use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::schools::model::{CreateSchoolDto, School, UpdateSchoolDto};
use crate::modules::users::controller::ProfileResponse;
use crate::modules::users::model::{
    CreateUserDto, SchoolInfo, UpdateUserDto, User, UserRole, UserWithSchool,
};
use crate::utils::response::{ErrorDetail, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::schools::controller::create_school,
        crate::modules::schools::controller::get_schools,
        crate::modules::schools::controller::get_school,
        crate::modules::schools::controller::update_school,
        crate::modules::schools::controller::delete_school,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::deactivate_user,
        crate::modules::users::controller::purge_user,
    ),
    components(schemas(
        School,
        CreateSchoolDto,
        UpdateSchoolDto,
        User,
        UserRole,
        UserWithSchool,
        SchoolInfo,
        CreateUserDto,
        UpdateUserDto,
        ProfileResponse,
        LoginRequest,
        LoginResponse,
        ErrorResponse,
        ErrorDetail,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Credential login"),
        (name = "Schools", description = "School management"),
        (name = "Users", description = "User management")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
