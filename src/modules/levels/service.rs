use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::levels::model::{CreateLevelDto, Level, LevelWithStats, UpdateLevelDto};
use crate::utils::errors::AppError;

const LEVEL_COLUMNS: &str =
    "id, department_id, level_number, display_name, is_active, created_at, updated_at";

pub struct LevelService;

impl LevelService {
    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateLevelDto) -> Result<Level, AppError> {
        let department_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM departments WHERE id = $1",
        )
        .bind(dto.department_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;
        if department_exists == 0 {
            return Err(AppError::not_found("Department not found".to_string()));
        }

        let query = format!(
            "INSERT INTO levels (department_id, level_number, display_name)
             VALUES ($1, $2, $3)
             RETURNING {LEVEL_COLUMNS}"
        );
        sqlx::query_as::<_, Level>(&query)
            .bind(dto.department_id)
            .bind(dto.level_number)
            .bind(&dto.display_name)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::bad_request(
                        "This level already exists in the department".to_string(),
                    );
                }
                AppError::database(e)
            })
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        department_id: Option<Uuid>,
    ) -> Result<Vec<LevelWithStats>, AppError> {
        let base = "SELECT l.id, l.department_id, l.level_number, l.display_name, l.is_active,
                    COUNT(u.id) AS member_count, l.created_at, l.updated_at
             FROM levels l
             LEFT JOIN users u ON u.level_id = l.id";

        match department_id {
            Some(department_id) => {
                let query = format!(
                    "{base} WHERE l.is_active AND l.department_id = $1
                     GROUP BY l.id ORDER BY l.level_number"
                );
                sqlx::query_as::<_, LevelWithStats>(&query)
                    .bind(department_id)
                    .fetch_all(db)
                    .await
                    .map_err(AppError::database)
            }
            None => {
                let query =
                    format!("{base} WHERE l.is_active GROUP BY l.id ORDER BY l.level_number");
                sqlx::query_as::<_, LevelWithStats>(&query)
                    .fetch_all(db)
                    .await
                    .map_err(AppError::database)
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<Level, AppError> {
        let query = format!("SELECT {LEVEL_COLUMNS} FROM levels WHERE id = $1");
        sqlx::query_as::<_, Level>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Level not found".to_string()))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(db: &PgPool, id: Uuid, dto: UpdateLevelDto) -> Result<Level, AppError> {
        let query = format!(
            "UPDATE levels SET
                display_name = COALESCE($2, display_name),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {LEVEL_COLUMNS}"
        );
        sqlx::query_as::<_, Level>(&query)
            .bind(id)
            .bind(&dto.display_name)
            .bind(dto.is_active)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Level not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM levels WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Level not found".to_string()));
        }
        Ok(())
    }
}
