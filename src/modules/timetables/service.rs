use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::timetables::model::{CreateTimetableDto, Timetable};
use crate::utils::errors::AppError;

const TIMETABLE_COLUMNS: &str = "id, level_id, title, details, effective_date, expires_at, \
     image_url, pdf_url, created_by, created_at";

// A timetable lapses at midnight UTC after its effective day.
fn expiry_for(effective_date: NaiveDate) -> DateTime<Utc> {
    let next_midnight = (effective_date + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();
    DateTime::from_naive_utc_and_offset(next_midnight, Utc)
}

// Lapsed timetables read as gone unless the list explicitly asks for them.
fn ensure_current(timetable: Timetable, now: DateTime<Utc>) -> Result<Timetable, AppError> {
    if timetable.expires_at <= now {
        return Err(AppError::not_found("Timetable has expired".to_string()));
    }
    Ok(timetable)
}

pub struct TimetableService;

impl TimetableService {
    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &PgPool,
        created_by: Uuid,
        dto: CreateTimetableDto,
    ) -> Result<Timetable, AppError> {
        let query = format!(
            "INSERT INTO timetables
                (level_id, title, details, effective_date, expires_at, image_url, pdf_url, created_by)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5, $6, $7, $8)
             RETURNING {TIMETABLE_COLUMNS}"
        );
        sqlx::query_as::<_, Timetable>(&query)
            .bind(dto.level_id)
            .bind(&dto.title)
            .bind(&dto.details)
            .bind(dto.effective_date)
            .bind(expiry_for(dto.effective_date))
            .bind(&dto.image_url)
            .bind(&dto.pdf_url)
            .bind(created_by)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_for_level(
        db: &PgPool,
        level_id: Uuid,
        include_expired: bool,
    ) -> Result<Vec<Timetable>, AppError> {
        let expiry_filter = if include_expired {
            ""
        } else {
            " AND expires_at > NOW()"
        };
        let query = format!(
            "SELECT {TIMETABLE_COLUMNS} FROM timetables
             WHERE level_id = $1{expiry_filter}
             ORDER BY effective_date DESC"
        );
        sqlx::query_as::<_, Timetable>(&query)
            .bind(level_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    /// The raw row, expired or not. Deletion and ownership checks need
    /// to see lapsed timetables too.
    #[instrument(skip(db))]
    pub async fn get_row(db: &PgPool, id: Uuid) -> Result<Timetable, AppError> {
        let query = format!("SELECT {TIMETABLE_COLUMNS} FROM timetables WHERE id = $1");
        sqlx::query_as::<_, Timetable>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Timetable not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<Timetable, AppError> {
        let timetable = Self::get_row(db, id).await?;
        ensure_current(timetable, Utc::now())
    }

    /// Deletes every timetable past its expiry, returning how many went.
    #[instrument(skip(db))]
    pub async fn purge_expired(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM timetables WHERE expires_at < NOW()")
            .execute(db)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM timetables WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Timetable not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn timetable_expiring_at(expires_at: DateTime<Utc>) -> Timetable {
        Timetable {
            id: Uuid::new_v4(),
            level_id: Uuid::new_v4(),
            title: "Monday lectures".to_string(),
            details: String::new(),
            effective_date: expires_at.date_naive() - Duration::days(1),
            expires_at,
            image_url: None,
            pdf_url: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry_is_end_of_effective_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let expiry = expiry_for(date);
        assert_eq!(expiry.to_rfc3339(), "2025-03-11T00:00:00+00:00");
    }

    #[test]
    fn test_lapsed_timetable_reads_as_not_found() {
        let now = Utc::now();
        let err = ensure_current(timetable_expiring_at(now - Duration::hours(2)), now)
            .expect_err("lapsed timetable must not be returned");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), "Timetable has expired");
    }

    #[test]
    fn test_current_timetable_passes_through() {
        let now = Utc::now();
        let timetable = timetable_expiring_at(now + Duration::hours(6));
        assert!(ensure_current(timetable, now).is_ok());
    }
}
