use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::events::model::{CreateEventDto, Event, UpdateEventDto};
use crate::utils::errors::AppError;

const EVENT_COLUMNS: &str =
    "id, title, details, location, starts_at, expires_at, image_url, created_by, created_at";

// Events stay listed for 30 minutes after they start.
fn expiry_for(starts_at: DateTime<Utc>) -> DateTime<Utc> {
    starts_at + Duration::minutes(30)
}

// Expired events read as gone, matching their absence from listings.
fn ensure_current(event: Event, now: DateTime<Utc>) -> Result<Event, AppError> {
    if event.expires_at <= now {
        return Err(AppError::not_found("Event has expired".to_string()));
    }
    Ok(event)
}

pub struct EventService;

impl EventService {
    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &PgPool,
        created_by: Uuid,
        dto: CreateEventDto,
    ) -> Result<Event, AppError> {
        let query = format!(
            "INSERT INTO events (title, details, location, starts_at, expires_at, image_url, created_by)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4, $5, $6, $7)
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&dto.title)
            .bind(&dto.details)
            .bind(&dto.location)
            .bind(dto.starts_at)
            .bind(expiry_for(dto.starts_at))
            .bind(&dto.image_url)
            .bind(created_by)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    /// Unexpired events, soonest first.
    #[instrument(skip(db))]
    pub async fn list_upcoming(db: &PgPool) -> Result<Vec<Event>, AppError> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE expires_at > NOW()
             ORDER BY starts_at"
        );
        sqlx::query_as::<_, Event>(&query)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<Event, AppError> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Event not found".to_string()))?;
        ensure_current(event, Utc::now())
    }

    /// Deletes every event past its expiry, returning how many went.
    #[instrument(skip(db))]
    pub async fn purge_expired(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE expires_at < NOW()")
            .execute(db)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected())
    }

    /// Moving `starts_at` recomputes the expiry.
    #[instrument(skip(db, dto))]
    pub async fn update(db: &PgPool, id: Uuid, dto: UpdateEventDto) -> Result<Event, AppError> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                details = COALESCE($3, details),
                location = COALESCE($4, location),
                starts_at = COALESCE($5, starts_at),
                expires_at = COALESCE($6, expires_at),
                image_url = COALESCE($7, image_url)
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&dto.title)
            .bind(&dto.details)
            .bind(&dto.location)
            .bind(dto.starts_at)
            .bind(dto.starts_at.map(expiry_for))
            .bind(&dto.image_url)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Event not found".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Event not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn event_expiring_at(expires_at: DateTime<Utc>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Matriculation".to_string(),
            details: String::new(),
            location: "Main auditorium".to_string(),
            starts_at: expires_at - Duration::minutes(30),
            expires_at,
            image_url: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry_is_thirty_minutes_after_start() {
        let starts_at = Utc::now();
        assert_eq!(expiry_for(starts_at), starts_at + Duration::minutes(30));
    }

    #[test]
    fn test_expired_event_reads_as_not_found() {
        let now = Utc::now();
        let err = ensure_current(event_expiring_at(now - Duration::minutes(1)), now)
            .expect_err("expired event must not be returned");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), "Event has expired");
    }

    #[test]
    fn test_current_event_passes_through() {
        let now = Utc::now();
        let event = event_expiring_at(now + Duration::minutes(10));
        assert!(ensure_current(event, now).is_ok());
    }
}
