use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::authz::gate;
use crate::middleware::auth::AuthUser;
use crate::modules::timetables::model::{
    CreateTimetableDto, PurgedTimetablesResponse, Timetable, TimetableFilterParams,
};
use crate::modules::timetables::service::TimetableService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Publish a timetable for a level.
#[utoipa::path(
    post,
    path = "/api/timetables",
    request_body = CreateTimetableDto,
    responses(
        (status = 201, description = "Timetable created", body = Timetable),
        (status = 403, description = "Not allowed to publish for this level"),
        (status = 404, description = "Level not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Timetables"
)]
#[instrument(skip(state, auth))]
pub async fn create_timetable(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateTimetableDto>,
) -> Result<(StatusCode, Json<Timetable>), AppError> {
    let actor_id = auth.user_id()?;
    gate::authorize_create(&state.db, actor_id, None, Some(dto.level_id)).await?;

    let timetable = TimetableService::create(&state.db, actor_id, dto).await?;
    Ok((StatusCode::CREATED, Json(timetable)))
}

/// List timetables for a level, newest effective date first.
///
/// Defaults to the caller's own level when none is given. Expired
/// entries are hidden unless `include_expired=true`.
#[utoipa::path(
    get,
    path = "/api/timetables",
    params(TimetableFilterParams),
    responses(
        (status = 200, description = "Timetables for the level", body = Vec<Timetable>),
        (status = 400, description = "No level to list for"),
        (status = 403, description = "Level not visible to this account")
    ),
    security(("bearer_auth" = [])),
    tag = "Timetables"
)]
#[instrument(skip(state, auth))]
pub async fn list_timetables(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TimetableFilterParams>,
) -> Result<Json<Vec<Timetable>>, AppError> {
    let actor_id = auth.user_id()?;
    let actor = gate::load_actor(&state.db, actor_id).await?;

    let level_id = match params.level_id.or(actor.level_id) {
        Some(id) => id,
        None => {
            return Err(AppError::bad_request(
                "Specify a level_id or set a level on your profile".to_string(),
            ));
        }
    };
    gate::authorize_view(&state.db, actor_id, None, Some(level_id)).await?;

    let timetables =
        TimetableService::list_for_level(&state.db, level_id, params.include_expired).await?;
    Ok(Json(timetables))
}

/// Fetch a single timetable.
#[utoipa::path(
    get,
    path = "/api/timetables/{id}",
    params(("id" = Uuid, Path, description = "Timetable id")),
    responses(
        (status = 200, description = "Timetable", body = Timetable),
        (status = 404, description = "Timetable not found or already expired")
    ),
    security(("bearer_auth" = [])),
    tag = "Timetables"
)]
#[instrument(skip(state, auth))]
pub async fn get_timetable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Timetable>, AppError> {
    let actor_id = auth.user_id()?;
    let timetable = TimetableService::get_by_id(&state.db, id).await?;
    gate::authorize_view(&state.db, actor_id, None, Some(timetable.level_id)).await?;
    Ok(Json(timetable))
}

/// Drop every timetable past its expiry.
#[utoipa::path(
    delete,
    path = "/api/timetables/expired",
    responses(
        (status = 200, description = "Expired timetables removed", body = PurgedTimetablesResponse),
        (status = 403, description = "Administrator only")
    ),
    security(("bearer_auth" = [])),
    tag = "Timetables"
)]
#[instrument(skip(state, auth))]
pub async fn purge_expired_timetables(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PurgedTimetablesResponse>, AppError> {
    gate::require_site_admin(&state.db, auth.user_id()?).await?;
    let purged = TimetableService::purge_expired(&state.db).await?;
    Ok(Json(PurgedTimetablesResponse { purged }))
}

/// Remove a timetable.
#[utoipa::path(
    delete,
    path = "/api/timetables/{id}",
    params(("id" = Uuid, Path, description = "Timetable id")),
    responses(
        (status = 204, description = "Timetable deleted"),
        (status = 403, description = "Not allowed to delete this timetable"),
        (status = 404, description = "Timetable not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Timetables"
)]
#[instrument(skip(state, auth))]
pub async fn delete_timetable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor_id = auth.user_id()?;
    let timetable = TimetableService::get_row(&state.db, id).await?;
    gate::authorize_modify(&state.db, actor_id, timetable.created_by).await?;

    TimetableService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
