use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// Raw post row. Scope columns follow the single-scope rule: both NULL
/// for global posts, `faculty_id` for faculty posts, `level_id` for
/// level posts (enforced by a table CHECK constraint).
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: String,
    pub image_url: Option<String>,
    pub faculty_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub is_pinned: bool,
    pub is_published: bool,
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: String,
    pub image_url: Option<String>,
    pub faculty_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub is_pinned: bool,
    pub views_count: i64,
    pub likes_count: i64,
    pub reposts_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub priority: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub faculty_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    #[serde(default)]
    pub is_pinned: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePostDto {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub priority: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct FeedParams {
    pub category: Option<String>,
    pub priority: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedPostsResponse {
    pub data: Vec<PostResponse>,
    pub meta: PaginationMeta,
}

/// Outcome of a like/repost toggle: whether the mark is now present
/// and the new total.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleResponse {
    pub active: bool,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub likes_count: i64,
    pub replies_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    pub parent_id: Option<Uuid>,
}
