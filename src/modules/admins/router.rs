use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{demote, list_admins, promote};

pub fn init_admins_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins))
        .route("/promote", post(promote))
        .route("/demote", post(demote))
}
