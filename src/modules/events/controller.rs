use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::authz::gate;
use crate::middleware::auth::AuthUser;
use crate::modules::events::model::{CreateEventDto, Event, PurgedEventsResponse, UpdateEventDto};
use crate::modules::events::service::EventService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 403, description = "Administrator only")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let actor = gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    let event = EventService::create(&state.db, actor.id, dto).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Upcoming events, soonest first", body = [Event])
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_events(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventService::list_upcoming(&state.db).await?;
    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found or already expired")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_event_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::get_by_id(&state.db, id).await?;
    Ok(Json(event))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Event not found")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEventDto>,
) -> Result<Json<Event>, AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    let event = EventService::update(&state.db, id, dto).await?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/api/events/expired",
    responses(
        (status = 200, description = "Expired events removed", body = PurgedEventsResponse),
        (status = 403, description = "Administrator only")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn purge_expired_events(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<PurgedEventsResponse>, AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    let purged = EventService::purge_expired(&state.db).await?;
    Ok(Json(PurgedEventsResponse { purged }))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Event not found")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    EventService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
