use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::authz::gate;
use crate::middleware::auth::AuthUser;
use crate::modules::levels::model::{
    CreateLevelDto, Level, LevelFilterParams, LevelWithStats, UpdateLevelDto,
};
use crate::modules::levels::service::LevelService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/levels",
    request_body = CreateLevelDto,
    responses(
        (status = 201, description = "Level created", body = Level),
        (status = 400, description = "Duplicate level in department"),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Department not found")
    ),
    tag = "Levels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_level(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateLevelDto>,
) -> Result<(StatusCode, Json<Level>), AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    let level = LevelService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(level)))
}

#[utoipa::path(
    get,
    path = "/api/levels",
    params(LevelFilterParams),
    responses(
        (status = 200, description = "Active levels", body = [LevelWithStats])
    ),
    tag = "Levels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_levels(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<LevelFilterParams>,
) -> Result<Json<Vec<LevelWithStats>>, AppError> {
    let levels = LevelService::list(&state.db, filters.department_id).await?;
    Ok(Json(levels))
}

#[utoipa::path(
    get,
    path = "/api/levels/{id}",
    params(("id" = Uuid, Path, description = "Level ID")),
    responses(
        (status = 200, description = "Level details", body = Level),
        (status = 404, description = "Level not found")
    ),
    tag = "Levels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_level_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Level>, AppError> {
    let level = LevelService::get_by_id(&state.db, id).await?;
    Ok(Json(level))
}

#[utoipa::path(
    put,
    path = "/api/levels/{id}",
    params(("id" = Uuid, Path, description = "Level ID")),
    request_body = UpdateLevelDto,
    responses(
        (status = 200, description = "Level updated", body = Level),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Level not found")
    ),
    tag = "Levels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_level(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLevelDto>,
) -> Result<Json<Level>, AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    let level = LevelService::update(&state.db, id, dto).await?;
    Ok(Json(level))
}

#[utoipa::path(
    delete,
    path = "/api/levels/{id}",
    params(("id" = Uuid, Path, description = "Level ID")),
    responses(
        (status = 204, description = "Level deleted"),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Level not found")
    ),
    tag = "Levels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_level(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    LevelService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
