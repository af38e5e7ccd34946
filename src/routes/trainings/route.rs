use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DbErr, SqlErr};

use super::dto::{CreateTrainingRequest, TrainingFilter, UpdateTrainingRequest};
use crate::entities::{module, training};
use crate::error::{TrainingError, TrainingResult};
use crate::extractor::{AuthClaims, CurrentEmployee, JsonBody, require_administrator};
use crate::repositories::{
    DepartmentRepository, ModuleRepository, NewTraining, TrainingRepository, TrainingUpdate,
};
use crate::services::catalog::TrainingNode;
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/trainings",
            get(get_all_trainings).post(create_training),
        )
        .route(
            "/api/v1/trainings/{training_id}",
            get(get_training)
                .put(update_training)
                .delete(delete_training),
        )
}

fn required(field: &'static str, value: &str) -> TrainingResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TrainingError::validation(field, format!("{field} must not be blank")));
    }
    Ok(value.to_string())
}

fn explicit_code(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn code_conflict(code: &str) -> TrainingError {
    TrainingError::Conflict(format!("Training code {code} is already in use"))
}

fn map_unique_code(err: DbErr, code: Option<&str>) -> TrainingError {
    match (err.sql_err(), code) {
        (Some(SqlErr::UniqueConstraintViolation(_)), Some(code)) => code_conflict(code),
        _ => err.into(),
    }
}

async fn ensure_department<C: ConnectionTrait>(conn: &C, department_id: i32) -> TrainingResult<()> {
    DepartmentRepository::new(conn)
        .find_by_id(department_id)
        .await?
        .ok_or_else(|| TrainingError::not_found("Department", department_id))?;
    Ok(())
}

async fn ensure_code_free<C: ConnectionTrait>(
    conn: &C,
    code: Option<&str>,
    owner: Option<i32>,
) -> TrainingResult<()> {
    let Some(code) = explicit_code(code) else {
        return Ok(());
    };

    match TrainingRepository::new(conn).find_by_code(&code).await? {
        Some(existing) if Some(existing.id) != owner => Err(code_conflict(&code)),
        _ => Ok(()),
    }
}

fn attach_modules(trainings: Vec<training::Model>, modules: Vec<module::Model>) -> Vec<TrainingNode> {
    let mut by_training: HashMap<i32, Vec<module::Model>> = HashMap::new();
    for m in modules {
        by_training.entry(m.training_id).or_default().push(m);
    }

    trainings
        .into_iter()
        .map(|t| {
            let own = by_training.remove(&t.id).unwrap_or_default();
            TrainingNode::new(t, own)
        })
        .collect()
}

/// Create a training (administrators only)
#[utoipa::path(
    post,
    path = "/api/v1/trainings",
    request_body = CreateTrainingRequest,
    responses(
        (status = 201, description = "Training created", body = TrainingNode),
        (status = 400, description = "Blank name or responsible"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Code already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn create_training(
    CurrentEmployee(caller): CurrentEmployee,
    JsonBody(payload): JsonBody<CreateTrainingRequest>,
) -> TrainingResult<(StatusCode, Json<TrainingNode>)> {
    require_administrator(&caller)?;

    let name = required("name", &payload.name)?;
    let responsible = required("responsible", &payload.responsible)?;

    let db = get_database_connection();
    ensure_department(db, payload.department_id).await?;
    ensure_code_free(db, payload.code.as_deref(), None).await?;

    let today = Utc::now().date_naive();
    let requested_code = explicit_code(payload.code.as_deref());
    let training = TrainingRepository::new(db)
        .create(
            NewTraining {
                code: payload.code,
                name,
                responsible,
                department_id: payload.department_id,
            },
            today,
        )
        .await
        .map_err(|err| map_unique_code(err, requested_code.as_deref()))?;

    tracing::info!(
        training_id = training.id,
        code = %training.code,
        created_by = caller.id,
        "Training created"
    );

    Ok((StatusCode::CREATED, Json(TrainingNode::new(training, Vec::new()))))
}

/// List trainings with their modules
#[utoipa::path(
    get,
    path = "/api/v1/trainings",
    params(TrainingFilter),
    responses(
        (status = 200, description = "Trainings retrieved", body = Vec<TrainingNode>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn get_all_trainings(
    AuthClaims(_claims): AuthClaims,
    Query(filter): Query<TrainingFilter>,
) -> TrainingResult<(StatusCode, Json<Vec<TrainingNode>>)> {
    let db = get_database_connection();
    let trainings = TrainingRepository::new(db)
        .find_all(filter.department_id)
        .await?;
    let modules = ModuleRepository::new(db).find_all(None).await?;

    Ok((StatusCode::OK, Json(attach_modules(trainings, modules))))
}

/// Get training by ID with its modules
#[utoipa::path(
    get,
    path = "/api/v1/trainings/{training_id}",
    params(
        ("training_id" = i32, Path, description = "Training ID")
    ),
    responses(
        (status = 200, description = "Training retrieved", body = TrainingNode),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn get_training(
    AuthClaims(_claims): AuthClaims,
    Path(training_id): Path<i32>,
) -> TrainingResult<(StatusCode, Json<TrainingNode>)> {
    let db = get_database_connection();
    let training = TrainingRepository::new(db)
        .find_by_id(training_id)
        .await?
        .ok_or_else(|| TrainingError::not_found("Training", training_id))?;
    let modules = ModuleRepository::new(db).find_all(Some(training_id)).await?;

    Ok((StatusCode::OK, Json(TrainingNode::new(training, modules))))
}

/// Update a training; `updated_on` is refreshed on every save
#[utoipa::path(
    put,
    path = "/api/v1/trainings/{training_id}",
    params(
        ("training_id" = i32, Path, description = "Training ID")
    ),
    request_body = UpdateTrainingRequest,
    responses(
        (status = 200, description = "Training updated", body = TrainingNode),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Training or department not found"),
        (status = 409, description = "Code already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn update_training(
    CurrentEmployee(caller): CurrentEmployee,
    Path(training_id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateTrainingRequest>,
) -> TrainingResult<(StatusCode, Json<TrainingNode>)> {
    require_administrator(&caller)?;

    let name = payload.name.as_deref().map(|n| required("name", n)).transpose()?;
    let responsible = payload
        .responsible
        .as_deref()
        .map(|r| required("responsible", r))
        .transpose()?;

    let db = get_database_connection();
    if let Some(department_id) = payload.department_id {
        ensure_department(db, department_id).await?;
    }
    ensure_code_free(db, payload.code.as_deref(), Some(training_id)).await?;

    let requested_code = explicit_code(payload.code.as_deref());
    let updated = TrainingRepository::new(db)
        .update(
            training_id,
            TrainingUpdate {
                code: payload.code,
                name,
                responsible,
                department_id: payload.department_id,
            },
            Utc::now().date_naive(),
        )
        .await
        .map_err(|err| map_unique_code(err, requested_code.as_deref()))?
        .ok_or_else(|| TrainingError::not_found("Training", training_id))?;

    let modules = ModuleRepository::new(db).find_all(Some(training_id)).await?;

    Ok((StatusCode::OK, Json(TrainingNode::new(updated, modules))))
}

/// Delete a training together with its modules and enrollments
#[utoipa::path(
    delete,
    path = "/api/v1/trainings/{training_id}",
    params(
        ("training_id" = i32, Path, description = "Training ID")
    ),
    responses(
        (status = 204, description = "Training deleted"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn delete_training(
    CurrentEmployee(caller): CurrentEmployee,
    Path(training_id): Path<i32>,
) -> TrainingResult<StatusCode> {
    require_administrator(&caller)?;

    if !TrainingRepository::new(get_database_connection())
        .delete(training_id)
        .await?
    {
        return Err(TrainingError::not_found("Training", training_id));
    }

    tracing::info!(training_id, deleted_by = caller.id, "Training deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::entities::sea_orm_active_enums::VideoSource;

    #[test]
    fn modules_follow_their_training() {
        let training_row = |id| training::Model {
            id,
            code: String::new(),
            name: format!("Training {id}"),
            responsible: "Rafael Lopes".to_string(),
            updated_on: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            department_id: 1,
        };
        let module_row = |id, training_id| module::Model {
            id,
            training_id,
            title: format!("Module {id}"),
            description: String::new(),
            video_embed: String::new(),
            video_source: VideoSource::Canva,
        };

        let nodes = attach_modules(
            vec![training_row(1), training_row(2)],
            vec![module_row(10, 2), module_row(11, 1), module_row(12, 2), module_row(13, 99)],
        );

        let ids: Vec<Vec<i32>> = nodes
            .iter()
            .map(|n| n.modules.iter().map(|m| m.id).collect())
            .collect();
        assert_eq!(ids, vec![vec![11], vec![10, 12]]);
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(matches!(
            required("responsible", "   "),
            Err(TrainingError::Validation { field: "responsible", .. })
        ));
        assert_eq!(required("name", " Monthly Close ").unwrap(), "Monthly Close");
    }
}
