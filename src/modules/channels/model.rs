use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// Raw channel row. Scope columns follow the same single-scope rule as
/// posts.
#[derive(Debug, Clone, FromRow)]
pub struct Channel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub created_by: Uuid,
    pub faculty_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ChannelResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub created_by: Uuid,
    pub creator_name: String,
    pub faculty_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChannelDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub faculty_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ChannelMemberResponse {
    pub user_id: Uuid,
    pub name: String,
    pub member_role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMessageDto {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct MessageParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedMessagesResponse {
    pub data: Vec<MessageResponse>,
    pub meta: PaginationMeta,
}
