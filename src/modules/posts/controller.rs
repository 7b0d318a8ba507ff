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
use crate::modules::posts::model::{
    CommentResponse, CreateCommentDto, CreatePostDto, FeedParams, PaginatedPostsResponse,
    PostResponse, ToggleResponse, UpdatePostDto,
};
use crate::modules::posts::service::PostService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Contradictory scope"),
        (status = 403, description = "Denied by creation rules"),
        (status = 404, description = "Referenced faculty or level not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePostDto>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let author_id = auth_user.user_id()?;
    let target =
        gate::authorize_create(&state.db, author_id, dto.faculty_id, dto.level_id).await?;

    let post = PostService::create(&state.db, author_id, dto, target).await?;
    let response = PostService::get_response(&state.db, post.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/posts/feed",
    params(FeedParams),
    responses(
        (status = 200, description = "Posts visible to the caller, pinned first", body = PaginatedPostsResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_feed(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<PaginatedPostsResponse>, AppError> {
    let actor = gate::load_actor(&state.db, auth_user.user_id()?).await?;
    let feed = PostService::feed(&state.db, &actor, params).await?;
    Ok(Json(feed))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostResponse),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, AppError> {
    let post = PostService::get_row(&state.db, id).await?;
    gate::authorize_view(&state.db, auth_user.user_id()?, post.faculty_id, post.level_id)
        .await?;

    let response = PostService::get_response(&state.db, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 403, description = "Not the owner and not a site admin"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdatePostDto>,
) -> Result<Json<PostResponse>, AppError> {
    let post = PostService::get_row(&state.db, id).await?;
    gate::authorize_modify(&state.db, auth_user.user_id()?, post.author_id).await?;

    PostService::update(&state.db, id, dto).await?;
    let response = PostService::get_response(&state.db, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the owner and not a site admin"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let post = PostService::get_row(&state.db, id).await?;
    gate::authorize_modify(&state.db, auth_user.user_id()?, post.author_id).await?;

    PostService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like toggled", body = ToggleResponse),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn toggle_like(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let post = PostService::get_row(&state.db, id).await?;
    gate::authorize_view(&state.db, user_id, post.faculty_id, post.level_id).await?;

    let toggled = PostService::toggle_like(&state.db, id, user_id).await?;
    Ok(Json(toggled))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/repost",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Repost toggled", body = ToggleResponse),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn toggle_repost(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let post = PostService::get_row(&state.db, id).await?;
    gate::authorize_view(&state.db, user_id, post.faculty_id, post.level_id).await?;

    let toggled = PostService::toggle_repost(&state.db, id, user_id).await?;
    Ok(Json(toggled))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = [CommentResponse]),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_comments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let post = PostService::get_row(&state.db, id).await?;
    gate::authorize_view(&state.db, auth_user.user_id()?, post.faculty_id, post.level_id)
        .await?;

    let comments = PostService::list_comments(&state.db, id).await?;
    Ok(Json(comments))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created"),
        (status = 400, description = "Parent comment mismatch"),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user_id = auth_user.user_id()?;
    let post = PostService::get_row(&state.db, id).await?;
    gate::authorize_view(&state.db, user_id, post.faculty_id, post.level_id).await?;

    let comment = PostService::create_comment(&state.db, id, user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": comment.id, "message": "Comment added" })),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the comment author or a site admin"),
        (status = 404, description = "Comment not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = gate::load_actor(&state.db, auth_user.user_id()?).await?;
    let comment = PostService::get_comment(&state.db, id).await?;

    // Comment authors may remove their own; site admins anything.
    let allowed = comment.user_id == actor.id
        || matches!(actor.role, UserRole::Admin | UserRole::Power);
    if !allowed {
        return Err(AppError::forbidden(
            "Can only delete own comments".to_string(),
        ));
    }

    PostService::delete_comment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/comments/{id}/like",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment like toggled", body = ToggleResponse),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Comment not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let comment = PostService::get_comment(&state.db, id).await?;
    let post = PostService::get_row(&state.db, comment.post_id).await?;
    gate::authorize_view(&state.db, user_id, post.faculty_id, post.level_id).await?;

    let toggled = PostService::toggle_comment_like(&state.db, id, user_id).await?;
    Ok(Json(toggled))
}
