use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::APP_CONFIG;
use crate::entities::employee;
use crate::error::{TrainingError, TrainingResult};
use crate::services::IdentityResolver;
use crate::static_service::get_database_connection;

/// Claims issued by the upstream identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
}

impl TokenClaims {
    /// Some providers only put the email in `sub`.
    pub fn caller_email(&self) -> &str {
        self.email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or(&self.sub)
    }
}

pub fn decode_token(token: &str, secret: &str) -> TrainingResult<TokenClaims> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| {
        tracing::debug!("Rejected bearer token: {}", err);
        TrainingError::Unauthorized
    })
}

/// Verified bearer token claims.
pub struct AuthClaims(pub TokenClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = TrainingError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| TrainingError::Unauthorized)?;

        let claims = decode_token(bearer.token(), &APP_CONFIG.jwt_secret)?;
        Ok(AuthClaims(claims))
    }
}

/// The employee behind the bearer token, provisioned on first contact.
pub struct CurrentEmployee(pub employee::Model);

impl<S> FromRequestParts<S> for CurrentEmployee
where
    S: Send + Sync,
{
    type Rejection = TrainingError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;

        let employee = IdentityResolver::new(get_database_connection())
            .resolve(claims.caller_email())
            .await?;

        Ok(CurrentEmployee(employee))
    }
}

pub fn require_administrator(employee: &employee::Model) -> TrainingResult<()> {
    if employee.administrator {
        Ok(())
    } else {
        Err(TrainingError::Forbidden(
            "Only administrators can change the catalog".to_string(),
        ))
    }
}

/// JSON request body whose rejections come back as `400 {error, field}`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = TrainingError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(body_rejection)?;
        Ok(JsonBody(value))
    }
}

fn body_rejection(rejection: JsonRejection) -> TrainingError {
    tracing::debug!(status = %rejection.status(), "Rejected request body: {}", rejection);
    TrainingError::validation("body", rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    fn sign(claims: &TokenClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips_claims() {
        let claims = TokenClaims {
            sub: "auth0|123".to_string(),
            email: Some("maria@example.com".to_string()),
            exp: far_future(),
        };

        let decoded = decode_token(&sign(&claims, SECRET), SECRET).unwrap();
        assert_eq!(decoded.caller_email(), "maria@example.com");
    }

    #[test]
    fn email_falls_back_to_subject() {
        let claims = TokenClaims {
            sub: "carla@example.com".to_string(),
            email: None,
            exp: far_future(),
        };
        assert_eq!(claims.caller_email(), "carla@example.com");
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let claims = TokenClaims {
            sub: "carla@example.com".to_string(),
            email: None,
            exp: far_future(),
        };

        let result = decode_token(&sign(&claims, "other-secret"), SECRET);
        assert!(matches!(result, Err(TrainingError::Unauthorized)));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let claims = TokenClaims {
            sub: "carla@example.com".to_string(),
            email: None,
            exp: 1_000,
        };

        let result = decode_token(&sign(&claims, SECRET), SECRET);
        assert!(matches!(result, Err(TrainingError::Unauthorized)));
    }

    #[test]
    fn only_administrators_pass() {
        let mut employee = employee::Model {
            id: 1,
            name: "Carla".to_string(),
            email: "carla@example.com".to_string(),
            administrator: false,
        };
        assert!(matches!(
            require_administrator(&employee),
            Err(TrainingError::Forbidden(_))
        ));

        employee.administrator = true;
        assert!(require_administrator(&employee).is_ok());
    }

    #[derive(Debug, Deserialize)]
    struct Completion {
        module_id: i32,
        completed: bool,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let request = json_request(r#"{"module_id": 4, "completed": true}"#);
        let JsonBody(payload) = JsonBody::<Completion>::from_request(request, &())
            .await
            .unwrap();

        assert_eq!(payload.module_id, 4);
        assert!(payload.completed);
    }

    #[tokio::test]
    async fn missing_field_is_a_validation_error() {
        let result =
            JsonBody::<Completion>::from_request(json_request(r#"{"completed": true}"#), &()).await;

        match result {
            Err(TrainingError::Validation { field, message }) => {
                assert_eq!(field, "body");
                assert!(message.contains("module_id"), "{message}");
            }
            _ => panic!("expected a validation error"),
        }
    }

    #[tokio::test]
    async fn syntax_error_and_missing_content_type_are_validation_errors() {
        let broken = JsonBody::<Completion>::from_request(json_request(r#"{"module_id": "#), &()).await;
        assert!(matches!(
            broken,
            Err(TrainingError::Validation { field: "body", .. })
        ));

        let untyped = axum::http::Request::builder()
            .method("POST")
            .body(Body::from(r#"{"module_id": 4, "completed": true}"#))
            .unwrap();
        let untyped = JsonBody::<Completion>::from_request(untyped, &()).await;
        assert!(matches!(
            untyped,
            Err(TrainingError::Validation { field: "body", .. })
        ));
    }
}
