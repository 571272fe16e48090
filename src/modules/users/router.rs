use axum::{
    Router,
    routing::{delete, get},
};

use crate::modules::users::controller::{
    create_user, deactivate_user, get_profile, get_user, get_users, purge_user, update_user,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/profile", get(get_profile))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(deactivate_user),
        )
        .route("/{id}/permanent", delete(purge_user))
}
