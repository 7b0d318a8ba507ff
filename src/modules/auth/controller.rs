use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::instrument;

use crate::modules::auth::model::{
    AuthResponse, ForgotPasswordDto, LoginDto, RegisterDto, ResendOtpDto, ResetPasswordDto,
    VerifyOtpDto,
};
use crate::modules::auth::service::AuthService;
use crate::modules::users::model::{User, UserRole};
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::validator::ValidatedJson;

fn spawn_email<F>(state: &AppState, send: impl FnOnce(EmailService) -> F + Send + 'static)
where
    F: std::future::Future<Output = Result<(), AppError>> + Send + 'static,
{
    let config = state.email_config.clone();
    tokio::spawn(async move {
        if let Err(e) = send(EmailService::new(config)).await {
            tracing::warn!(error = %e.error, "failed to send notification email");
        }
    });
}

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    create_access_token(user.id, &user.email, &user.name, user.role, &state.jwt_config)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created, verification code emailed"),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation error")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    // The configured primary power admin gets the power role from the start.
    let initial_role = if state.auth_config.is_power_admin_email(&dto.email) {
        UserRole::Power
    } else {
        UserRole::User
    };

    let user = AuthService::register(&state.db, dto, initial_role).await?;

    if let Some(code) = user.otp.clone() {
        let (email, name) = (user.email.clone(), user.name.clone());
        spawn_email(&state, move |mailer| async move {
            mailer.send_otp_email(&email, &name, &code).await
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created. Check your email for a verification code."
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpDto,
    responses(
        (status = 200, description = "Email verified, session token issued", body = AuthResponse),
        (status = 400, description = "Invalid or expired code"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyOtpDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = AuthService::verify_otp(&state.db, dto).await?;

    let (email, name) = (user.email.clone(), user.name.clone());
    spawn_email(&state, move |mailer| async move {
        mailer.send_welcome_email(&email, &name).await
    });

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/resend-otp",
    request_body = ResendOtpDto,
    responses(
        (status = 200, description = "Fresh verification code emailed"),
        (status = 400, description = "Email already verified"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn resend_otp(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResendOtpDto>,
) -> Result<Json<Value>, AppError> {
    let user = AuthService::resend_otp(&state.db, &dto.email).await?;

    if let Some(code) = user.otp.clone() {
        let (email, name) = (user.email.clone(), user.name.clone());
        spawn_email(&state, move |mailer| async move {
            mailer.send_otp_email(&email, &name, &code).await
        });
    }

    Ok(Json(json!({ "message": "Verification code sent" })))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let assert_power = state.auth_config.is_power_admin_email(&dto.email);
    let user = AuthService::login(&state.db, dto, assert_power).await?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset code emailed when the account exists")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordDto>,
) -> Result<Json<Value>, AppError> {
    if let Some(user) = AuthService::create_reset_code(&state.db, &dto.email).await?
        && let Some(code) = user.reset_token.clone()
    {
        let (email, name) = (user.email.clone(), user.name.clone());
        spawn_email(&state, move |mailer| async move {
            mailer.send_password_reset_email(&email, &name, &code).await
        });
    }

    // Same answer whether or not the account exists.
    Ok(Json(json!({
        "message": "If that account exists, a reset code has been sent"
    })))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Invalid or expired reset code"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordDto>,
) -> Result<Json<Value>, AppError> {
    let user = AuthService::reset_password(&state.db, dto).await?;

    let (email, name) = (user.email.clone(), user.name.clone());
    spawn_email(&state, move |mailer| async move {
        mailer.send_password_changed_email(&email, &name).await
    });

    Ok(Json(json!({ "message": "Password reset successfully" })))
}
