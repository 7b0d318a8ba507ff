use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::auth::model::{LoginDto, RegisterDto, ResetPasswordDto, VerifyOtpDto};
use crate::modules::users::model::{User, UserRole};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::otp;
use crate::utils::password::{hash_password, verify_password};

const USER_RETURNING: &str = "id, name, email, password, role, is_verified, otp, otp_expires_at, \
     reset_token, reset_token_expires_at, bio, phone, profile_image_url, faculty_id, \
     department_id, level_id, managed_department_id, created_at, updated_at";

pub struct AuthService;

impl AuthService {
    /// Creates an unverified account with a fresh verification code.
    /// Registering again with an unverified email rotates the code
    /// instead of failing, so abandoned signups can be completed.
    #[instrument(skip(db, dto))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterDto,
        initial_role: UserRole,
    ) -> Result<User, AppError> {
        let code = otp::generate_code();
        let expires_at = Utc::now() + Duration::minutes(10);

        if let Some(existing) = UserService::get_by_email(db, &dto.email).await? {
            if existing.is_verified {
                return Err(AppError::bad_request(
                    "An account with this email already exists".to_string(),
                ));
            }

            let hashed = hash_password(&dto.password)?;
            let query = format!(
                "UPDATE users SET name = $2, password = $3, otp = $4, otp_expires_at = $5,
                    updated_at = NOW()
                 WHERE id = $1
                 RETURNING {USER_RETURNING}"
            );
            return sqlx::query_as::<_, User>(&query)
                .bind(existing.id)
                .bind(&dto.name)
                .bind(&hashed)
                .bind(&code)
                .bind(expires_at)
                .fetch_one(db)
                .await
                .map_err(AppError::database);
        }

        let hashed = hash_password(&dto.password)?;
        let query = format!(
            "INSERT INTO users (name, email, password, role, otp, otp_expires_at)
             VALUES ($1, LOWER($2), $3, $4, $5, $6)
             RETURNING {USER_RETURNING}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(&hashed)
            .bind(initial_role)
            .bind(&code)
            .bind(expires_at)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db, dto))]
    pub async fn verify_otp(db: &PgPool, dto: VerifyOtpDto) -> Result<User, AppError> {
        let user = UserService::get_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

        if user.is_verified {
            return Err(AppError::bad_request(
                "Email is already verified".to_string(),
            ));
        }

        let valid = user.otp.as_deref() == Some(dto.otp.as_str())
            && user.otp_expires_at.is_some_and(|exp| exp > Utc::now());
        if !valid {
            return Err(AppError::bad_request(
                "Invalid or expired verification code".to_string(),
            ));
        }

        let query = format!(
            "UPDATE users SET is_verified = TRUE, otp = NULL, otp_expires_at = NULL,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_RETURNING}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn resend_otp(db: &PgPool, email: &str) -> Result<User, AppError> {
        let user = UserService::get_by_email(db, email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

        if user.is_verified {
            return Err(AppError::bad_request(
                "Email is already verified".to_string(),
            ));
        }

        let code = otp::generate_code();
        let expires_at = Utc::now() + Duration::minutes(10);

        let query = format!(
            "UPDATE users SET otp = $2, otp_expires_at = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_RETURNING}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&code)
            .bind(expires_at)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    /// Checks credentials. When `assert_power` is set (the configured
    /// primary power admin logged in) the power role is re-applied, so
    /// the designated account can never be locked out of role management.
    #[instrument(skip(db, dto))]
    pub async fn login(db: &PgPool, dto: LoginDto, assert_power: bool) -> Result<User, AppError> {
        let user = UserService::get_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password".to_string()))?;

        if !verify_password(&dto.password, &user.password)? {
            return Err(AppError::unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.is_verified {
            return Err(AppError::forbidden(
                "Email is not verified".to_string(),
            ));
        }

        if assert_power && user.role != UserRole::Power {
            let query = format!(
                "UPDATE users SET role = 'power', updated_at = NOW()
                 WHERE id = $1
                 RETURNING {USER_RETURNING}"
            );
            return sqlx::query_as::<_, User>(&query)
                .bind(user.id)
                .fetch_one(db)
                .await
                .map_err(AppError::database);
        }

        Ok(user)
    }

    /// Stores a reset code valid for one hour. Returns None when no
    /// account matches, so callers can answer generically and not leak
    /// which emails are registered.
    #[instrument(skip(db))]
    pub async fn create_reset_code(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let Some(user) = UserService::get_by_email(db, email).await? else {
            return Ok(None);
        };

        let code = otp::generate_code();
        let expires_at = Utc::now() + Duration::hours(1);

        let query = format!(
            "UPDATE users SET reset_token = $2, reset_token_expires_at = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_RETURNING}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&code)
            .bind(expires_at)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;

        Ok(Some(user))
    }

    #[instrument(skip(db, dto))]
    pub async fn reset_password(db: &PgPool, dto: ResetPasswordDto) -> Result<User, AppError> {
        let user = UserService::get_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

        let valid = user.reset_token.as_deref() == Some(dto.reset_code.as_str())
            && user
                .reset_token_expires_at
                .is_some_and(|exp| exp > Utc::now());
        if !valid {
            return Err(AppError::bad_request(
                "Invalid or expired reset code".to_string(),
            ));
        }

        let hashed = hash_password(&dto.new_password)?;
        let query = format!(
            "UPDATE users SET password = $2, reset_token = NULL,
                reset_token_expires_at = NULL, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_RETURNING}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&hashed)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }
}
