use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::authz::engine;
use crate::authz::gate;
use crate::middleware::auth::AuthUser;
use crate::modules::admins::model::{
    AdminFilterParams, DemoteDto, PaginatedAdminsResponse, PromoteDto, RoleChangeResponse,
};
use crate::modules::admins::service::AdminService;
use crate::modules::users::model::UserRole;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

fn notify_role_change(state: &AppState, email: String, name: String, from: UserRole, to: UserRole) {
    let config = state.email_config.clone();
    tokio::spawn(async move {
        let mailer = EmailService::new(config);
        if let Err(e) = mailer
            .send_role_change_email(&email, &name, from.as_str(), to.as_str())
            .await
        {
            tracing::warn!(error = %e.error, "failed to send role change email");
        }
    });
}

#[utoipa::path(
    get,
    path = "/api/admins",
    params(AdminFilterParams),
    responses(
        (status = 200, description = "Accounts holding an administrative role", body = PaginatedAdminsResponse),
        (status = 403, description = "Power admin only")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_admins(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<AdminFilterParams>,
) -> Result<Json<PaginatedAdminsResponse>, AppError> {
    gate::require_power_admin(&state.db, auth_user.user_id()?).await?;
    let admins = AdminService::list_admins(&state.db, filters).await?;
    Ok(Json(admins))
}

#[utoipa::path(
    post,
    path = "/api/admins/promote",
    request_body = PromoteDto,
    responses(
        (status = 200, description = "Role granted", body = RoleChangeResponse),
        (status = 400, description = "Invalid target role or missing department"),
        (status = 403, description = "Denied by role rules"),
        (status = 404, description = "Target account or department not found")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn promote(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<PromoteDto>,
) -> Result<Json<RoleChangeResponse>, AppError> {
    let requester = gate::require_power_admin(&state.db, auth_user.user_id()?).await?;

    let managed_department_id = match dto.role {
        UserRole::Admin => None,
        UserRole::DAdmin => {
            let department_id = dto.managed_department_id.ok_or_else(|| {
                AppError::bad_request(
                    "A department admin needs a managed department".to_string(),
                )
            })?;
            if !AdminService::department_exists(&state.db, department_id).await? {
                return Err(AppError::not_found("Department not found".to_string()));
            }
            Some(department_id)
        }
        UserRole::User | UserRole::Power => {
            return Err(AppError::bad_request(
                "Accounts can only be promoted to admin or d_admin".to_string(),
            ));
        }
    };

    let target = UserService::get_by_email(&state.db, &dto.email)
        .await?
        .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

    engine::can_promote(requester.role, target.role).require()?;

    let previous_role = target.role;
    let updated =
        AdminService::assign_role(&state.db, target.id, dto.role, managed_department_id).await?;

    notify_role_change(
        &state,
        updated.email.clone(),
        updated.name.clone(),
        previous_role,
        updated.role,
    );

    Ok(Json(RoleChangeResponse {
        user: updated.into(),
        previous_role,
    }))
}

#[utoipa::path(
    post,
    path = "/api/admins/demote",
    request_body = DemoteDto,
    responses(
        (status = 200, description = "Role revoked", body = RoleChangeResponse),
        (status = 403, description = "Denied by role rules"),
        (status = 404, description = "Target account not found")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn demote(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DemoteDto>,
) -> Result<Json<RoleChangeResponse>, AppError> {
    let requester = gate::require_power_admin(&state.db, auth_user.user_id()?).await?;

    let target = UserService::get_by_email(&state.db, &dto.email)
        .await?
        .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

    let is_primary = state.auth_config.is_power_admin_email(&target.email);
    engine::can_demote(requester.role, target.role, is_primary).require()?;

    let previous_role = target.role;
    let updated = AdminService::assign_role(&state.db, target.id, UserRole::User, None).await?;

    notify_role_change(
        &state,
        updated.email.clone(),
        updated.name.clone(),
        previous_role,
        updated.role,
    );

    Ok(Json(RoleChangeResponse {
        user: updated.into(),
        previous_role,
    }))
}
