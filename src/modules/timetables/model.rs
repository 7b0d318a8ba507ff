use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A daily timetable for one level. Timetables expire at the end of
/// their effective day.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Timetable {
    pub id: Uuid,
    pub level_id: Uuid,
    pub title: String,
    pub details: String,
    pub effective_date: NaiveDate,
    pub expires_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTimetableDto {
    pub level_id: Uuid,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub details: Option<String>,
    pub effective_date: NaiveDate,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(url)]
    pub pdf_url: Option<String>,
}

/// How many expired timetables a purge removed.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgedTimetablesResponse {
    pub purged: u64,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct TimetableFilterParams {
    /// Defaults to the caller's own level.
    pub level_id: Option<Uuid>,
    /// Include timetables whose effective day has passed.
    #[serde(default)]
    pub include_expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_response_reports_count() {
        let json = serde_json::to_string(&PurgedTimetablesResponse { purged: 3 }).unwrap();
        assert_eq!(json, r#"{"purged":3}"#);
    }
}
