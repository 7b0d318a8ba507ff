use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::admins::model::{AdminFilterParams, PaginatedAdminsResponse};
use crate::modules::users::model::{User, UserResponse, UserRole};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const USER_RETURNING: &str = "id, name, email, password, role, is_verified, otp, otp_expires_at, \
     reset_token, reset_token_expires_at, bio, phone, profile_image_url, faculty_id, \
     department_id, level_id, managed_department_id, created_at, updated_at";

pub struct AdminService;

impl AdminService {
    #[instrument(skip(db))]
    pub async fn list_admins(
        db: &PgPool,
        filters: AdminFilterParams,
    ) -> Result<PaginatedAdminsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let (total, rows) = match filters.role {
            Some(role) => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE role = $1",
                )
                .bind(role)
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;

                let query = format!(
                    "SELECT {USER_RETURNING} FROM users WHERE role = $1
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                let rows = sqlx::query_as::<_, User>(&query)
                    .bind(role)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(db)
                    .await
                    .map_err(AppError::database)?;
                (total, rows)
            }
            None => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE role <> 'user'",
                )
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;

                let query = format!(
                    "SELECT {USER_RETURNING} FROM users WHERE role <> 'user'
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                );
                let rows = sqlx::query_as::<_, User>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(db)
                    .await
                    .map_err(AppError::database)?;
                (total, rows)
            }
        };

        Ok(PaginatedAdminsResponse {
            data: rows.into_iter().map(UserResponse::from).collect(),
            meta: PaginationMeta::new(total, limit, offset),
        })
    }

    #[instrument(skip(db))]
    pub async fn assign_role(
        db: &PgPool,
        user_id: Uuid,
        role: UserRole,
        managed_department_id: Option<Uuid>,
    ) -> Result<User, AppError> {
        let query = format!(
            "UPDATE users SET role = $2, managed_department_id = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_RETURNING}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(role)
            .bind(managed_department_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn department_exists(db: &PgPool, department_id: Uuid) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM departments WHERE id = $1",
        )
        .bind(department_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;
        Ok(count > 0)
    }
}
