pub mod seeder;

use sqlx::PgPool;

use crate::modules::users::model::UserRole;
use crate::utils::password::hash_password;

/// Creates a verified power admin account directly in the database.
///
/// Power admins hold the only role allowed to promote and demote other
/// accounts, so the first one has to come from outside the API.
pub async fn create_power_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (name, email, password, role, is_verified)
         VALUES ($1, LOWER($2), $3, $4, TRUE)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(UserRole::Power)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}
