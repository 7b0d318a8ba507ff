use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::model::{UserResponse, UserRole};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// Grants an administrative position to a plain account. Promoting to
/// `d_admin` requires the department the account will manage; the
/// `power` role is never granted through the API.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PromoteDto {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub role: UserRole,
    pub managed_department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DemoteDto {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleChangeResponse {
    pub user: UserResponse,
    pub previous_role: UserRole,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AdminFilterParams {
    pub role: Option<UserRole>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAdminsResponse {
    pub data: Vec<UserResponse>,
    pub meta: PaginationMeta,
}
