use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A campus event. Events drop out of listings 30 minutes after they
/// start (`expires_at` is derived at creation, not client supplied).
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub details: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub details: Option<String>,
    #[validate(length(max = 300))]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// How many expired events a purge removed.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgedEventsResponse {
    pub purged: u64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub details: Option<String>,
    #[validate(length(max = 300))]
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    #[validate(url)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_response_reports_count() {
        let json = serde_json::to_string(&PurgedEventsResponse { purged: 7 }).unwrap();
        assert_eq!(json, r#"{"purged":7}"#);
    }
}
