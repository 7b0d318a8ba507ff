use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::departments::model::{
    CreateDepartmentDto, Department, UpdateDepartmentDto,
};
use crate::utils::errors::AppError;

const DEPARTMENT_COLUMNS: &str =
    "id, faculty_id, name, code, description, is_active, created_at, updated_at";

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateDepartmentDto) -> Result<Department, AppError> {
        let faculty_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM faculties WHERE id = $1",
        )
        .bind(dto.faculty_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;
        if faculty_exists == 0 {
            return Err(AppError::not_found("Faculty not found".to_string()));
        }

        let query = format!(
            "INSERT INTO departments (faculty_id, name, code, description)
             VALUES ($1, $2, UPPER($3), $4)
             RETURNING {DEPARTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(dto.faculty_id)
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
                        "A department with this code already exists".to_string(),
                    );
                }
                AppError::database(e)
            })
    }

    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, faculty_id: Option<Uuid>) -> Result<Vec<Department>, AppError> {
        match faculty_id {
            Some(faculty_id) => {
                let query = format!(
                    "SELECT {DEPARTMENT_COLUMNS} FROM departments
                     WHERE is_active AND faculty_id = $1 ORDER BY name"
                );
                sqlx::query_as::<_, Department>(&query)
                    .bind(faculty_id)
                    .fetch_all(db)
                    .await
                    .map_err(AppError::database)
            }
            None => {
                let query = format!(
                    "SELECT {DEPARTMENT_COLUMNS} FROM departments
                     WHERE is_active ORDER BY name"
                );
                sqlx::query_as::<_, Department>(&query)
                    .fetch_all(db)
                    .await
                    .map_err(AppError::database)
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<Department, AppError> {
        let query = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Department not found".to_string()))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let query = format!(
            "UPDATE departments SET
                name = COALESCE($2, name),
                code = COALESCE(UPPER($3), code),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {DEPARTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.code)
            .bind(&dto.description)
            .bind(dto.is_active)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Department not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Department not found".to_string()));
        }
        Ok(())
    }
}
