use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};

use super::dto::{CreateModuleRequest, ModuleFilter, UpdateModuleRequest, parse_video_source};
use crate::entities::sea_orm_active_enums::VideoSource;
use crate::error::{TrainingError, TrainingResult};
use crate::extractor::{AuthClaims, CurrentEmployee, JsonBody, require_administrator};
use crate::repositories::{ModuleRepository, ModuleUpdate, NewModule, TrainingRepository};
use crate::services::catalog::ModuleNode;
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/modules", get(get_all_modules).post(create_module))
        .route(
            "/api/v1/modules/{module_id}",
            get(get_module).put(update_module).delete(delete_module),
        )
}

fn required_title(title: &str) -> TrainingResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TrainingError::validation("title", "Title must not be blank"));
    }
    Ok(title.to_string())
}

async fn ensure_training(training_id: i32) -> TrainingResult<()> {
    TrainingRepository::new(get_database_connection())
        .find_by_id(training_id)
        .await?
        .ok_or_else(|| TrainingError::not_found("Training", training_id))?;
    Ok(())
}

/// Add a module to a training (administrators only)
#[utoipa::path(
    post,
    path = "/api/v1/modules",
    request_body = CreateModuleRequest,
    responses(
        (status = 201, description = "Module created", body = ModuleNode),
        (status = 400, description = "Blank title or unknown video source"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Modules"
)]
pub async fn create_module(
    CurrentEmployee(caller): CurrentEmployee,
    JsonBody(payload): JsonBody<CreateModuleRequest>,
) -> TrainingResult<(StatusCode, Json<ModuleNode>)> {
    require_administrator(&caller)?;

    let title = required_title(&payload.title)?;
    let video_source = payload
        .video_source
        .as_deref()
        .map(parse_video_source)
        .transpose()?
        .unwrap_or_default();
    ensure_training(payload.training_id).await?;

    let module = ModuleRepository::new(get_database_connection())
        .create(NewModule {
            training_id: payload.training_id,
            title,
            description: payload.description,
            video_embed: payload.video_embed.trim().to_string(),
            video_source,
        })
        .await?;

    tracing::info!(
        module_id = module.id,
        training_id = module.training_id,
        created_by = caller.id,
        "Module created"
    );

    Ok((StatusCode::CREATED, Json(module.into())))
}

/// List modules in insertion order
#[utoipa::path(
    get,
    path = "/api/v1/modules",
    params(ModuleFilter),
    responses(
        (status = 200, description = "Modules retrieved", body = Vec<ModuleNode>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Modules"
)]
pub async fn get_all_modules(
    AuthClaims(_claims): AuthClaims,
    Query(filter): Query<ModuleFilter>,
) -> TrainingResult<(StatusCode, Json<Vec<ModuleNode>>)> {
    let modules = ModuleRepository::new(get_database_connection())
        .find_all(filter.training_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(modules.into_iter().map(ModuleNode::from).collect()),
    ))
}

/// Get module by ID
#[utoipa::path(
    get,
    path = "/api/v1/modules/{module_id}",
    params(
        ("module_id" = i32, Path, description = "Module ID")
    ),
    responses(
        (status = 200, description = "Module retrieved", body = ModuleNode),
        (status = 404, description = "Module not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Modules"
)]
pub async fn get_module(
    AuthClaims(_claims): AuthClaims,
    Path(module_id): Path<i32>,
) -> TrainingResult<(StatusCode, Json<ModuleNode>)> {
    let module = ModuleRepository::new(get_database_connection())
        .find_by_id(module_id)
        .await?
        .ok_or_else(|| TrainingError::not_found("Module", module_id))?;

    Ok((StatusCode::OK, Json(module.into())))
}

/// Update a module (administrators only)
#[utoipa::path(
    put,
    path = "/api/v1/modules/{module_id}",
    params(
        ("module_id" = i32, Path, description = "Module ID")
    ),
    request_body = UpdateModuleRequest,
    responses(
        (status = 200, description = "Module updated", body = ModuleNode),
        (status = 400, description = "Blank title or unknown video source"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Module or training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Modules"
)]
pub async fn update_module(
    CurrentEmployee(caller): CurrentEmployee,
    Path(module_id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateModuleRequest>,
) -> TrainingResult<(StatusCode, Json<ModuleNode>)> {
    require_administrator(&caller)?;

    let title = payload.title.as_deref().map(required_title).transpose()?;
    let video_source: Option<VideoSource> = payload
        .video_source
        .as_deref()
        .map(parse_video_source)
        .transpose()?;
    if let Some(training_id) = payload.training_id {
        ensure_training(training_id).await?;
    }

    let updated = ModuleRepository::new(get_database_connection())
        .update(
            module_id,
            ModuleUpdate {
                training_id: payload.training_id,
                title,
                description: payload.description,
                video_embed: payload.video_embed.map(|v| v.trim().to_string()),
                video_source,
            },
        )
        .await?
        .ok_or_else(|| TrainingError::not_found("Module", module_id))?;

    Ok((StatusCode::OK, Json(updated.into())))
}

/// Delete a module and its progress rows (administrators only)
#[utoipa::path(
    delete,
    path = "/api/v1/modules/{module_id}",
    params(
        ("module_id" = i32, Path, description = "Module ID")
    ),
    responses(
        (status = 204, description = "Module deleted"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Module not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Modules"
)]
pub async fn delete_module(
    CurrentEmployee(caller): CurrentEmployee,
    Path(module_id): Path<i32>,
) -> TrainingResult<StatusCode> {
    require_administrator(&caller)?;

    let deleted = ModuleRepository::new(get_database_connection())
        .delete(module_id)
        .await?;
    if !deleted {
        return Err(TrainingError::not_found("Module", module_id));
    }

    tracing::info!(module_id, deleted_by = caller.id, "Module deleted");
    Ok(StatusCode::NO_CONTENT)
}
