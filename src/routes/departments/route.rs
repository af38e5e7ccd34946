use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::get,
};

use super::dto::{CreateDepartmentRequest, DepartmentResponse, UpdateDepartmentRequest};
use crate::error::{TrainingError, TrainingResult};
use crate::extractor::{AuthClaims, CurrentEmployee, JsonBody, require_administrator};
use crate::repositories::{DepartmentRepository, DepartmentUpdate};
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/departments",
            get(get_all_departments).post(create_department),
        )
        .route(
            "/api/v1/departments/{department_id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}

fn required_name(name: &str) -> TrainingResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrainingError::validation("name", "Name must not be blank"));
    }
    Ok(name.to_string())
}

/// Create a new department (administrators only)
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Blank name"),
        (status = 403, description = "Administrators only")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn create_department(
    CurrentEmployee(caller): CurrentEmployee,
    JsonBody(payload): JsonBody<CreateDepartmentRequest>,
) -> TrainingResult<(StatusCode, Json<DepartmentResponse>)> {
    require_administrator(&caller)?;
    let name = required_name(&payload.name)?;

    let department = DepartmentRepository::new(get_database_connection())
        .create(name)
        .await?;

    tracing::info!(department_id = department.id, created_by = caller.id, "Department created");

    Ok((StatusCode::CREATED, Json(department.into())))
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Departments retrieved", body = Vec<DepartmentResponse>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn get_all_departments(
    AuthClaims(_claims): AuthClaims,
) -> TrainingResult<(StatusCode, Json<Vec<DepartmentResponse>>)> {
    let departments = DepartmentRepository::new(get_database_connection())
        .find_all()
        .await?;

    Ok((
        StatusCode::OK,
        Json(departments.into_iter().map(DepartmentResponse::from).collect()),
    ))
}

/// Get department by ID
#[utoipa::path(
    get,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id" = i32, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department retrieved", body = DepartmentResponse),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn get_department(
    AuthClaims(_claims): AuthClaims,
    Path(department_id): Path<i32>,
) -> TrainingResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = DepartmentRepository::new(get_database_connection())
        .find_by_id(department_id)
        .await?
        .ok_or_else(|| TrainingError::not_found("Department", department_id))?;

    Ok((StatusCode::OK, Json(department.into())))
}

/// Rename a department (administrators only)
#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id" = i32, Path, description = "Department ID")
    ),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = DepartmentResponse),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn update_department(
    CurrentEmployee(caller): CurrentEmployee,
    Path(department_id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateDepartmentRequest>,
) -> TrainingResult<(StatusCode, Json<DepartmentResponse>)> {
    require_administrator(&caller)?;

    let updates = DepartmentUpdate {
        name: payload.name.as_deref().map(required_name).transpose()?,
    };

    let updated = DepartmentRepository::new(get_database_connection())
        .update(department_id, updates)
        .await?
        .ok_or_else(|| TrainingError::not_found("Department", department_id))?;

    Ok((StatusCode::OK, Json(updated.into())))
}

/// Delete a department together with its trainings (administrators only)
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id" = i32, Path, description = "Department ID")
    ),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn delete_department(
    CurrentEmployee(caller): CurrentEmployee,
    Path(department_id): Path<i32>,
) -> TrainingResult<StatusCode> {
    require_administrator(&caller)?;

    let deleted = DepartmentRepository::new(get_database_connection())
        .delete(department_id)
        .await?;

    if !deleted {
        return Err(TrainingError::not_found("Department", department_id));
    }

    tracing::info!(department_id, deleted_by = caller.id, "Department deleted");
    Ok(StatusCode::NO_CONTENT)
}
