use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::authz::gate;
use crate::middleware::auth::AuthUser;
use crate::modules::faculties::model::{
    CreateFacultyDto, Faculty, FacultyWithStats, UpdateFacultyDto,
};
use crate::modules::faculties::service::FacultyService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/faculties",
    request_body = CreateFacultyDto,
    responses(
        (status = 201, description = "Faculty created", body = Faculty),
        (status = 400, description = "Duplicate code"),
        (status = 403, description = "Administrator only")
    ),
    tag = "Faculties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_faculty(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateFacultyDto>,
) -> Result<(StatusCode, Json<Faculty>), AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    let faculty = FacultyService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

#[utoipa::path(
    get,
    path = "/api/faculties",
    responses(
        (status = 200, description = "Active faculties", body = [FacultyWithStats])
    ),
    tag = "Faculties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_faculties(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<FacultyWithStats>>, AppError> {
    let faculties = FacultyService::list(&state.db).await?;
    Ok(Json(faculties))
}

#[utoipa::path(
    get,
    path = "/api/faculties/{id}",
    params(("id" = Uuid, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty details", body = Faculty),
        (status = 404, description = "Faculty not found")
    ),
    tag = "Faculties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_faculty_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Faculty>, AppError> {
    let faculty = FacultyService::get_by_id(&state.db, id).await?;
    Ok(Json(faculty))
}

#[utoipa::path(
    put,
    path = "/api/faculties/{id}",
    params(("id" = Uuid, Path, description = "Faculty ID")),
    request_body = UpdateFacultyDto,
    responses(
        (status = 200, description = "Faculty updated", body = Faculty),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Faculty not found")
    ),
    tag = "Faculties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_faculty(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateFacultyDto>,
) -> Result<Json<Faculty>, AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    let faculty = FacultyService::update(&state.db, id, dto).await?;
    Ok(Json(faculty))
}

#[utoipa::path(
    delete,
    path = "/api/faculties/{id}",
    params(("id" = Uuid, Path, description = "Faculty ID")),
    responses(
        (status = 204, description = "Faculty deleted"),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Faculty not found")
    ),
    tag = "Faculties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_faculty(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    gate::require_site_admin(&state.db, auth_user.user_id()?).await?;
    FacultyService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
