use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{
    CompleteModuleRequest, CompleteModuleResponse, EnrollmentResponse, LoginEmailRequest,
    StartTrainingRequest,
};
use crate::error::{TrainingError, TrainingResult};
use crate::extractor::{AuthClaims, CurrentEmployee, JsonBody};
use crate::routes::employees::dto::EmployeeResponse;
use crate::services::catalog::{DepartmentNode, ProgressSnapshot};
use crate::services::identity::normalize_email;
use crate::services::{CatalogProjection, EnrollmentEngine, IdentityResolver};
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/public/login-email", post(login_email))
        .route("/api/v1/public/start-training", post(start_training))
        .route("/api/v1/public/complete-module", post(complete_module))
        .route("/api/v1/public/catalog", get(get_catalog))
        .route("/api/v1/public/me/progress", get(get_my_progress))
}

/// Resolve (or provision) the employee for the token's email
#[utoipa::path(
    post,
    path = "/api/v1/public/login-email",
    request_body = LoginEmailRequest,
    responses(
        (status = 200, description = "Employee resolved", body = EmployeeResponse),
        (status = 400, description = "Malformed email"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Email does not match the token")
    ),
    security(("bearer_auth" = [])),
    tag = "Public"
)]
pub async fn login_email(
    AuthClaims(claims): AuthClaims,
    JsonBody(payload): JsonBody<LoginEmailRequest>,
) -> TrainingResult<(StatusCode, Json<EmployeeResponse>)> {
    let requested = normalize_email(&payload.email)?;
    let verified = normalize_email(claims.caller_email())?;
    if requested != verified {
        return Err(TrainingError::Forbidden(
            "Email does not match the authenticated caller".to_string(),
        ));
    }

    let employee = IdentityResolver::new(get_database_connection())
        .resolve_with_name(&verified, payload.name.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(employee.into())))
}

/// Start (or restart) a training for the caller
#[utoipa::path(
    post,
    path = "/api/v1/public/start-training",
    request_body = StartTrainingRequest,
    responses(
        (status = 200, description = "Enrollment in progress", body = EnrollmentResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Public"
)]
pub async fn start_training(
    CurrentEmployee(employee): CurrentEmployee,
    JsonBody(payload): JsonBody<StartTrainingRequest>,
) -> TrainingResult<(StatusCode, Json<EnrollmentResponse>)> {
    let enrollment = EnrollmentEngine::new(get_database_connection())
        .start_training(&employee, payload.training_id)
        .await?;

    Ok((StatusCode::OK, Json(enrollment.into())))
}

/// Mark a module as completed or not and recompute the enrollment
#[utoipa::path(
    post,
    path = "/api/v1/public/complete-module",
    request_body = CompleteModuleRequest,
    responses(
        (status = 200, description = "Progress recorded", body = CompleteModuleResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Module not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Public"
)]
pub async fn complete_module(
    CurrentEmployee(employee): CurrentEmployee,
    JsonBody(payload): JsonBody<CompleteModuleRequest>,
) -> TrainingResult<(StatusCode, Json<CompleteModuleResponse>)> {
    let completion = EnrollmentEngine::new(get_database_connection())
        .complete_module(&employee, payload.module_id, payload.completed)
        .await?;

    Ok((StatusCode::OK, Json(completion.into())))
}

/// Department → training → module tree
#[utoipa::path(
    get,
    path = "/api/v1/public/catalog",
    responses(
        (status = 200, description = "Catalog retrieved", body = Vec<DepartmentNode>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Public"
)]
pub async fn get_catalog(
    CurrentEmployee(_employee): CurrentEmployee,
) -> TrainingResult<(StatusCode, Json<Vec<DepartmentNode>>)> {
    let tree = CatalogProjection::new(get_database_connection())
        .catalog()
        .await?;

    Ok((StatusCode::OK, Json(tree)))
}

/// The caller's enrollments and module progress
#[utoipa::path(
    get,
    path = "/api/v1/public/me/progress",
    responses(
        (status = 200, description = "Progress retrieved", body = ProgressSnapshot),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Public"
)]
pub async fn get_my_progress(
    CurrentEmployee(employee): CurrentEmployee,
) -> TrainingResult<(StatusCode, Json<ProgressSnapshot>)> {
    let snapshot = CatalogProjection::new(get_database_connection())
        .my_progress(employee.id)
        .await?;

    Ok((StatusCode::OK, Json(snapshot)))
}
