use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{
    ChangePasswordDto, UpdateAcademicsDto, UpdateProfileDto, UserResponse,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_by_id(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/profile/academics",
    request_body = UpdateAcademicsDto,
    responses(
        (status = 200, description = "Academic affiliation updated", body = UserResponse),
        (status = 400, description = "Inconsistent faculty/department/level chain"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_academics(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateAcademicsDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_academics(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/profile/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password incorrect"),
        (status = 422, description = "Validation error")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<Value>, AppError> {
    let user = UserService::change_password(&state.db, auth_user.user_id()?, dto).await?;

    // Best effort; the password is already changed.
    let email_config = state.email_config.clone();
    tokio::spawn(async move {
        let mailer = EmailService::new(email_config);
        if let Err(e) = mailer.send_password_changed_email(&user.email, &user.name).await {
            tracing::warn!(error = %e.error, "failed to send password changed email");
        }
    });

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
