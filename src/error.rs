//! Error types surfaced by the identity resolver and the enrollment engine

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Missing or invalid bearer token")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type TrainingResult<T> = Result<T, TrainingError>;

impl TrainingError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl IntoResponse for TrainingError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            TrainingError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "field": field }),
            ),
            TrainingError::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.to_string(), "resource": resource, "id": id }),
            ),
            TrainingError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, json!({ "error": self.to_string() }))
            }
            TrainingError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            TrainingError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            TrainingError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = TrainingError::validation("email", "Email is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = TrainingError::not_found("Training", 42);
        assert_eq!(err.to_string(), "Training 42 not found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let response =
            TrainingError::Database(DbErr::Custom("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
