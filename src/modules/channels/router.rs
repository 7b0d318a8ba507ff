use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    create_channel, delete_channel, get_channel, get_channels, get_members, get_messages,
    join_channel, leave_channel, send_message,
};

pub fn init_channels_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_channel).get(get_channels))
        .route("/{id}", get(get_channel).delete(delete_channel))
        .route("/{id}/join", post(join_channel))
        .route("/{id}/leave", delete(leave_channel))
        .route("/{id}/members", get(get_members))
        .route("/{id}/messages", get(get_messages).post(send_message))
}
