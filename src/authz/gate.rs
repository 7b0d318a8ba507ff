//! Database-backed glue around the pure rules in [`crate::authz::engine`].
//!
//! Handlers call these helpers with the caller's id and the raw scope
//! columns from the request or the stored row. The gate loads the actor,
//! resolves the scope's referenced entities (404 when absent), then
//! delegates to the pure decision functions.

use sqlx::PgPool;
use uuid::Uuid;

use crate::authz::engine::{self, ActorSnapshot, PostScope, ScopeTarget};
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ActorRow {
    id: Uuid,
    role: UserRole,
    faculty_id: Option<Uuid>,
    level_id: Option<Uuid>,
    managed_department_id: Option<Uuid>,
}

/// Loads the actor's current authorization fields. 404 when the account
/// behind a still-valid token has been deleted.
pub async fn load_actor(db: &PgPool, user_id: Uuid) -> Result<ActorSnapshot, AppError> {
    let row = sqlx::query_as::<_, ActorRow>(
        "SELECT id, role, faculty_id, level_id, managed_department_id
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

    Ok(ActorSnapshot {
        id: row.id,
        role: row.role,
        faculty_id: row.faculty_id,
        level_id: row.level_id,
        managed_department_id: row.managed_department_id,
    })
}

/// Resolves a classified scope against the database, verifying the
/// referenced faculty or level exists and fetching the level's owning
/// department for the department-admin rules.
pub async fn resolve_scope(db: &PgPool, scope: PostScope) -> Result<ScopeTarget, AppError> {
    match scope {
        PostScope::Global => Ok(ScopeTarget::Global),
        PostScope::Faculty(faculty_id) => {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM faculties WHERE id = $1",
            )
            .bind(faculty_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;

            if exists == 0 {
                return Err(AppError::not_found("Faculty not found".to_string()));
            }
            Ok(ScopeTarget::Faculty { faculty_id })
        }
        PostScope::Level(level_id) => {
            let department_id = sqlx::query_scalar::<_, Uuid>(
                "SELECT department_id FROM levels WHERE id = $1",
            )
            .bind(level_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Level not found".to_string()))?;

            Ok(ScopeTarget::Level {
                level_id,
                department_id,
            })
        }
    }
}

/// Full creation check: validates the raw scope input (400 on a dual
/// faculty+level scope), resolves it, and applies the creation rules.
/// Returns the resolved target so callers can persist the scope columns.
pub async fn authorize_create(
    db: &PgPool,
    actor_id: Uuid,
    faculty_id: Option<Uuid>,
    level_id: Option<Uuid>,
) -> Result<ScopeTarget, AppError> {
    let actor = load_actor(db, actor_id).await?;
    let scope = PostScope::from_input(faculty_id, level_id)?;
    let target = resolve_scope(db, scope).await?;
    engine::can_create(&actor, &target).require()?;
    Ok(target)
}

/// View check against a stored row's scope columns. Level wins when a
/// legacy row carries both.
pub async fn authorize_view(
    db: &PgPool,
    actor_id: Uuid,
    faculty_id: Option<Uuid>,
    level_id: Option<Uuid>,
) -> Result<(), AppError> {
    let actor = load_actor(db, actor_id).await?;
    let scope = PostScope::classify(faculty_id, level_id);
    let target = resolve_scope(db, scope).await?;
    engine::can_view(&actor, &target).require()
}

/// Edit/delete check against a resource's owner.
pub async fn authorize_modify(
    db: &PgPool,
    actor_id: Uuid,
    resource_owner_id: Uuid,
) -> Result<(), AppError> {
    let actor = load_actor(db, actor_id).await?;
    engine::can_modify(&actor, resource_owner_id).require()
}

/// Check that the actor holds one of the site-admin roles. Used by the
/// academic-structure CRUD endpoints.
pub async fn require_site_admin(db: &PgPool, actor_id: Uuid) -> Result<ActorSnapshot, AppError> {
    let actor = load_actor(db, actor_id).await?;
    match actor.role {
        UserRole::Admin | UserRole::Power => Ok(actor),
        _ => Err(AppError::forbidden(
            "Administrator privileges required".to_string(),
        )),
    }
}

/// Check that the actor holds the power role. Used by role management.
pub async fn require_power_admin(db: &PgPool, actor_id: Uuid) -> Result<ActorSnapshot, AppError> {
    let actor = load_actor(db, actor_id).await?;
    if actor.role != UserRole::Power {
        return Err(AppError::forbidden(
            "Only a power admin may perform this action".to_string(),
        ));
    }
    Ok(actor)
}
