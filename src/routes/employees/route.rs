use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::get,
};

use super::dto::{EmployeeResponse, UpdateEmployeeRequest};
use crate::error::{TrainingError, TrainingResult};
use crate::extractor::{CurrentEmployee, JsonBody, require_administrator};
use crate::repositories::{EmployeeRepository, EmployeeUpdate};
use crate::services::CatalogProjection;
use crate::services::catalog::EmployeeTraining;
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/employees", get(get_all_employees))
        .route(
            "/api/v1/employees/{employee_id}",
            get(get_employee).put(update_employee),
        )
        .route(
            "/api/v1/employees/{employee_id}/trainings",
            get(get_employee_trainings),
        )
}

/// List employees (administrators only)
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employees retrieved", body = Vec<EmployeeResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Administrators only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_all_employees(
    CurrentEmployee(caller): CurrentEmployee,
) -> TrainingResult<(StatusCode, Json<Vec<EmployeeResponse>>)> {
    require_administrator(&caller)?;

    let employees = EmployeeRepository::new(get_database_connection())
        .find_all()
        .await?;

    Ok((
        StatusCode::OK,
        Json(employees.into_iter().map(EmployeeResponse::from).collect()),
    ))
}

/// Get employee by ID (administrators only)
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id" = i32, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee retrieved", body = EmployeeResponse),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee(
    CurrentEmployee(caller): CurrentEmployee,
    Path(employee_id): Path<i32>,
) -> TrainingResult<(StatusCode, Json<EmployeeResponse>)> {
    require_administrator(&caller)?;

    let employee = EmployeeRepository::new(get_database_connection())
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| TrainingError::not_found("Employee", employee_id))?;

    Ok((StatusCode::OK, Json(employee.into())))
}

/// Rename an employee or toggle the administrator flag
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id" = i32, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Blank name"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn update_employee(
    CurrentEmployee(caller): CurrentEmployee,
    Path(employee_id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateEmployeeRequest>,
) -> TrainingResult<(StatusCode, Json<EmployeeResponse>)> {
    require_administrator(&caller)?;

    let name = match payload.name {
        Some(name) if name.trim().is_empty() => {
            return Err(TrainingError::validation("name", "Name must not be blank"));
        }
        other => other.map(|name| name.trim().to_string()),
    };

    let updated = EmployeeRepository::new(get_database_connection())
        .update(
            employee_id,
            EmployeeUpdate {
                name,
                administrator: payload.administrator,
            },
        )
        .await?
        .ok_or_else(|| TrainingError::not_found("Employee", employee_id))?;

    tracing::info!(
        employee_id,
        administrator = updated.administrator,
        updated_by = caller.id,
        "Employee updated"
    );

    Ok((StatusCode::OK, Json(updated.into())))
}

/// Training history of one employee, most recently started first
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/trainings",
    params(
        ("employee_id" = i32, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Enrollments retrieved", body = Vec<EmployeeTraining>),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee_trainings(
    CurrentEmployee(caller): CurrentEmployee,
    Path(employee_id): Path<i32>,
) -> TrainingResult<(StatusCode, Json<Vec<EmployeeTraining>>)> {
    require_administrator(&caller)?;

    let db = get_database_connection();
    EmployeeRepository::new(db)
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| TrainingError::not_found("Employee", employee_id))?;

    let history = CatalogProjection::new(db)
        .employee_trainings(employee_id)
        .await?;

    Ok((StatusCode::OK, Json(history)))
}
