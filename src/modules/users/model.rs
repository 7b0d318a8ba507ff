use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Closed set of account roles.
///
/// The serialized spellings (`user`, `d_admin`, `admin`, `power`) are the
/// canonical ones, used identically in the database enum, JWT claims and
/// JSON bodies. No aliases are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    DAdmin,
    Admin,
    Power,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::DAdmin => "d_admin",
            UserRole::Admin => "admin",
            UserRole::Power => "power",
        }
    }
}

/// Full user row. Never serialized directly; responses go through
/// [`UserResponse`] so the password hash and OTP columns stay private.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub profile_image_url: Option<String>,
    pub faculty_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub managed_department_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub profile_image_url: Option<String>,
    pub faculty_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub managed_department_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            bio: user.bio,
            phone: user.phone,
            profile_image_url: user.profile_image_url,
            faculty_id: user.faculty_id,
            department_id: user.department_id,
            level_id: user.level_id,
            managed_department_id: user.managed_department_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(url)]
    pub profile_image_url: Option<String>,
}

/// Where the account sits in the academic tree. The department must
/// belong to the faculty and the level to the department; the service
/// checks both.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAcademicsDto {
    pub faculty_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_spellings_are_canonical() {
        assert_eq!(
            serde_json::to_string(&UserRole::DAdmin).unwrap(),
            "\"d_admin\""
        );
        assert_eq!(serde_json::to_string(&UserRole::Power).unwrap(), "\"power\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"d_admin\"").unwrap(),
            UserRole::DAdmin
        );
        // Legacy spellings from older clients are rejected outright.
        assert!(serde_json::from_str::<UserRole>("\"d-admin\"").is_err());
        assert!(serde_json::from_str::<UserRole>("\"power_admin\"").is_err());
    }

    #[test]
    fn test_as_str_matches_serde() {
        for role in [
            UserRole::User,
            UserRole::DAdmin,
            UserRole::Admin,
            UserRole::Power,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
