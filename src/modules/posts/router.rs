use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    create_comment, create_post, delete_comment, delete_post, get_comments, get_feed, get_post,
    toggle_comment_like, toggle_like, toggle_repost, update_post,
};

pub fn init_posts_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post))
        .route("/feed", get(get_feed))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/repost", post(toggle_repost))
        .route("/{id}/comments", get(get_comments).post(create_comment))
}

/// Comment operations addressed by comment id rather than post id.
pub fn init_comments_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(delete_comment))
        .route("/{id}/like", post(toggle_comment_like))
}
