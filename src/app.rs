use std::sync::Arc;

use axum::Router;
use axum::middleware;
use http::{HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::{
    ServiceBuilderExt,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::MakeRequestUuid,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_docs::ApiDoc;
use crate::config::APP_CONFIG;
use crate::middleware::http_logger::http_logger;
use crate::routes;

/// Every route of the service, without middleware.
pub fn api_router() -> Router {
    Router::new()
        .merge(routes::health::create_route())
        .merge(routes::public::create_route())
        .merge(routes::departments::create_route())
        .merge(routes::trainings::create_route())
        .merge(routes::modules::create_route())
        .merge(routes::employees::create_route())
}

fn cors_layer(allowed: &str) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT];

    if allowed.trim() == "*" {
        // Wildcard origins cannot be combined with credentials
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers);
    }

    let origins: Vec<HeaderValue> = allowed
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(true)
}

pub async fn create_app() -> anyhow::Result<Router> {
    let mut router = api_router();

    if APP_CONFIG.swagger_enabled {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    // from_fn middleware sits inside the tower stack so it sees the request id
    let router = router.layer(middleware::from_fn(http_logger));

    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .sensitive_request_headers(sensitive_headers.clone())
        .layer(cors_layer(&APP_CONFIG.cors_allowed_origins))
        .propagate_x_request_id()
        .sensitive_response_headers(sensitive_headers)
        .compression();

    Ok(router.layer(middleware))
}
