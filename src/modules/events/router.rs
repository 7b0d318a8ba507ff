use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    create_event, delete_event, get_event_by_id, get_events, purge_expired_events, update_event,
};

pub fn init_events_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_event).get(get_events))
        .route("/expired", delete(purge_expired_events))
        .route(
            "/{id}",
            get(get_event_by_id).put(update_event).delete(delete_event),
        )
}
