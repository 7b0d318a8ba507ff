use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::faculties::model::{
    CreateFacultyDto, Faculty, FacultyWithStats, UpdateFacultyDto,
};
use crate::utils::errors::AppError;

pub struct FacultyService;

impl FacultyService {
    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateFacultyDto) -> Result<Faculty, AppError> {
        sqlx::query_as::<_, Faculty>(
            "INSERT INTO faculties (name, code, description)
             VALUES ($1, UPPER($2), $3)
             RETURNING id, name, code, description, is_active, created_at, updated_at",
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(
                    "A faculty with this code already exists".to_string(),
                );
            }
            AppError::database(e)
        })
    }

    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<FacultyWithStats>, AppError> {
        sqlx::query_as::<_, FacultyWithStats>(
            "SELECT f.id, f.name, f.code, f.description, f.is_active,
                    COUNT(d.id) AS department_count,
                    f.created_at, f.updated_at
             FROM faculties f
             LEFT JOIN departments d ON d.faculty_id = f.id
             WHERE f.is_active
             GROUP BY f.id
             ORDER BY f.name",
        )
        .fetch_all(db)
        .await
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<Faculty, AppError> {
        sqlx::query_as::<_, Faculty>(
            "SELECT id, name, code, description, is_active, created_at, updated_at
             FROM faculties WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found("Faculty not found".to_string()))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateFacultyDto,
    ) -> Result<Faculty, AppError> {
        sqlx::query_as::<_, Faculty>(
            "UPDATE faculties SET
                name = COALESCE($2, name),
                code = COALESCE(UPPER($3), code),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id, name, code, description, is_active, created_at, updated_at",
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.description)
        .bind(dto.is_active)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found("Faculty not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM faculties WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Faculty not found".to_string()));
        }
        Ok(())
    }
}
