use axum::Router;
use axum::routing::{delete, get};

use crate::modules::timetables::controller::{
    create_timetable, delete_timetable, get_timetable, list_timetables, purge_expired_timetables,
};
use crate::state::AppState;

pub fn init_timetables_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_timetables).post(create_timetable))
        .route("/expired", delete(purge_expired_timetables))
        .route("/{id}", get(get_timetable).delete(delete_timetable))
}
