use axum::{Router, routing::get};

use crate::modules::schools::controller::{
    create_school, delete_school, get_school, get_schools, update_school,
};
use crate::state::AppState;

pub fn init_schools_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_schools).post(create_school))
        .route(
            "/{id}",
            get(get_school).put(update_school).delete(delete_school),
        )
}
