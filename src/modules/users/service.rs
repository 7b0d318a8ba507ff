use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{
    ChangePasswordDto, UpdateAcademicsDto, UpdateProfileDto, User, UserResponse,
};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

const USER_COLUMNS: &str = "id, name, email, password, role, is_verified, otp, otp_expires_at, \
     reset_token, reset_token_expires_at, bio, phone, profile_image_url, faculty_id, \
     department_id, level_id, managed_department_id, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("User not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn get_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<UserResponse, AppError> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                phone = COALESCE($4, phone),
                profile_image_url = COALESCE($5, profile_image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(&dto.name)
            .bind(&dto.bio)
            .bind(&dto.phone)
            .bind(&dto.profile_image_url)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Re-homes the account in the academic tree. Each given id must
    /// exist and the chain must be consistent: department within the
    /// faculty, level within the department.
    #[instrument(skip(db, dto))]
    pub async fn update_academics(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateAcademicsDto,
    ) -> Result<UserResponse, AppError> {
        if let (Some(faculty_id), Some(department_id)) = (dto.faculty_id, dto.department_id) {
            let matches = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM departments WHERE id = $1 AND faculty_id = $2",
            )
            .bind(department_id)
            .bind(faculty_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;
            if matches == 0 {
                return Err(AppError::bad_request(
                    "Department does not belong to the given faculty".to_string(),
                ));
            }
        }

        if let (Some(department_id), Some(level_id)) = (dto.department_id, dto.level_id) {
            let matches = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM levels WHERE id = $1 AND department_id = $2",
            )
            .bind(level_id)
            .bind(department_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;
            if matches == 0 {
                return Err(AppError::bad_request(
                    "Level does not belong to the given department".to_string(),
                ));
            }
        }

        let query = format!(
            "UPDATE users SET
                faculty_id = $2,
                department_id = $3,
                level_id = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(dto.faculty_id)
            .bind(dto.department_id)
            .bind(dto.level_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

        Ok(user.into())
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<User, AppError> {
        let user = Self::get_by_id(db, user_id).await?;

        if !verify_password(&dto.current_password, &user.password)? {
            return Err(AppError::unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let hashed = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(&hashed)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        Ok(user)
    }
}
