use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;
use uuid::Uuid;

use crate::authz::gate;
use crate::middleware::auth::AuthUser;
use crate::modules::channels::model::{
    ChannelMemberResponse, ChannelResponse, CreateChannelDto, CreateMessageDto, MessageParams,
    MessageResponse, PaginatedMessagesResponse,
};
use crate::modules::channels::service::ChannelService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Posting and reading messages requires membership; site admins are
/// exempt so they can moderate.
async fn require_member_or_admin(
    state: &AppState,
    channel_id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
    let actor = gate::load_actor(&state.db, user_id).await?;
    if matches!(actor.role, UserRole::Admin | UserRole::Power) {
        return Ok(());
    }
    if ChannelService::is_member(&state.db, channel_id, user_id).await? {
        return Ok(());
    }
    Err(AppError::forbidden(
        "Join this channel first".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/channels",
    request_body = CreateChannelDto,
    responses(
        (status = 201, description = "Channel created", body = ChannelResponse),
        (status = 400, description = "Contradictory scope"),
        (status = 403, description = "Denied by creation rules"),
        (status = 404, description = "Referenced faculty or level not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_channel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateChannelDto>,
) -> Result<(StatusCode, Json<ChannelResponse>), AppError> {
    let creator_id = auth_user.user_id()?;
    let target =
        gate::authorize_create(&state.db, creator_id, dto.faculty_id, dto.level_id).await?;

    let channel = ChannelService::create(&state.db, creator_id, dto, target).await?;
    let response = ChannelService::get_response(&state.db, channel.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/channels",
    responses(
        (status = 200, description = "Channels within the caller's scope", body = [ChannelResponse])
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_channels(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ChannelResponse>>, AppError> {
    let actor = gate::load_actor(&state.db, auth_user.user_id()?).await?;
    let channels = ChannelService::list_visible(&state.db, &actor).await?;
    Ok(Json(channels))
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}",
    params(("id" = Uuid, Path, description = "Channel ID")),
    responses(
        (status = 200, description = "Channel details", body = ChannelResponse),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Channel not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_channel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChannelResponse>, AppError> {
    let channel = ChannelService::get_row(&state.db, id).await?;
    gate::authorize_view(
        &state.db,
        auth_user.user_id()?,
        channel.faculty_id,
        channel.level_id,
    )
    .await?;

    let response = ChannelService::get_response(&state.db, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/channels/{id}/join",
    params(("id" = Uuid, Path, description = "Channel ID")),
    responses(
        (status = 200, description = "Joined"),
        (status = 400, description = "Already a member"),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Channel not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn join_channel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user_id = auth_user.user_id()?;
    let channel = ChannelService::get_row(&state.db, id).await?;
    gate::authorize_view(&state.db, user_id, channel.faculty_id, channel.level_id).await?;

    ChannelService::join(&state.db, id, user_id).await?;
    Ok(Json(json!({ "message": "Joined channel" })))
}

#[utoipa::path(
    delete,
    path = "/api/channels/{id}/leave",
    params(("id" = Uuid, Path, description = "Channel ID")),
    responses(
        (status = 200, description = "Left the channel"),
        (status = 400, description = "Not a removable member"),
        (status = 404, description = "Channel not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn leave_channel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    ChannelService::get_row(&state.db, id).await?;
    ChannelService::leave(&state.db, id, auth_user.user_id()?).await?;
    Ok(Json(json!({ "message": "Left channel" })))
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}/members",
    params(("id" = Uuid, Path, description = "Channel ID")),
    responses(
        (status = 200, description = "Channel members", body = [ChannelMemberResponse]),
        (status = 403, description = "Members only"),
        (status = 404, description = "Channel not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_members(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChannelMemberResponse>>, AppError> {
    ChannelService::get_row(&state.db, id).await?;
    require_member_or_admin(&state, id, auth_user.user_id()?).await?;

    let members = ChannelService::members(&state.db, id).await?;
    Ok(Json(members))
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}/messages",
    params(("id" = Uuid, Path, description = "Channel ID"), MessageParams),
    responses(
        (status = 200, description = "Messages, newest first", body = PaginatedMessagesResponse),
        (status = 403, description = "Members only"),
        (status = 404, description = "Channel not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_messages(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<MessageParams>,
) -> Result<Json<PaginatedMessagesResponse>, AppError> {
    ChannelService::get_row(&state.db, id).await?;
    require_member_or_admin(&state, id, auth_user.user_id()?).await?;

    let messages = ChannelService::list_messages(&state.db, id, params).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    post,
    path = "/api/channels/{id}/messages",
    params(("id" = Uuid, Path, description = "Channel ID")),
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 403, description = "Members only"),
        (status = 404, description = "Channel not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateMessageDto>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let user_id = auth_user.user_id()?;
    ChannelService::get_row(&state.db, id).await?;
    require_member_or_admin(&state, id, user_id).await?;

    let message = ChannelService::create_message(&state.db, id, user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    delete,
    path = "/api/channels/{id}",
    params(("id" = Uuid, Path, description = "Channel ID")),
    responses(
        (status = 204, description = "Channel deleted"),
        (status = 403, description = "Not the creator and not a site admin"),
        (status = 404, description = "Channel not found")
    ),
    tag = "Channels",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_channel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let channel = ChannelService::get_row(&state.db, id).await?;
    gate::authorize_modify(&state.db, auth_user.user_id()?, channel.created_by).await?;

    ChannelService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
