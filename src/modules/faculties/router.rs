use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_faculty, delete_faculty, get_faculties, get_faculty_by_id, update_faculty,
};

pub fn init_faculties_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_faculty).get(get_faculties))
        .route(
            "/{id}",
            get(get_faculty_by_id)
                .put(update_faculty)
                .delete(delete_faculty),
        )
}
