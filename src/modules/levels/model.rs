use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A year cohort (100 Level, 200 Level, ...) within a department.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Level {
    pub id: Uuid,
    pub department_id: Uuid,
    pub level_number: i32,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct LevelWithStats {
    pub id: Uuid,
    pub department_id: Uuid,
    pub level_number: i32,
    pub display_name: String,
    pub is_active: bool,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLevelDto {
    pub department_id: Uuid,
    #[validate(range(min = 100, max = 900))]
    pub level_number: i32,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLevelDto {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct LevelFilterParams {
    pub department_id: Option<Uuid>,
}
