use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, header};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::config::APP_CONFIG;
use crate::error::TrainingError;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_FIELDS: [&str; 6] = [
    "token",
    "access_token",
    "id_token",
    "authorization",
    "jwt",
    "secret",
];

const SENSITIVE_HEADERS: [&str; 3] = ["authorization", "cookie", "x-api-key"];

fn should_ignore_path(path: &str) -> bool {
    path.trim_end_matches('/') == "/health"
        || path.starts_with("/swagger-ui")
        || path.starts_with("/api-docs")
}

/// Replaces sensitive values at any depth.
fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if SENSITIVE_FIELDS.contains(&key.to_ascii_lowercase().as_str()) {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, redact(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

fn body_as_json(bytes: &Bytes) -> Value {
    serde_json::from_slice::<Value>(bytes)
        .map(redact)
        .unwrap_or(Value::Null)
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = headers.clone();
    for name in SENSITIVE_HEADERS {
        if let Some(value) = filtered.get_mut(name) {
            *value = HeaderValue::from_static(REDACTED);
        }
    }
    filtered
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Logs one structured line per request with redacted headers and bodies.
pub async fn http_logger(req: Request, next: Next) -> Result<impl IntoResponse, TrainingError> {
    if should_ignore_path(req.uri().path()) || req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let req_headers = req.headers().clone();
    let request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (parts, body) = req.into_parts();
    let req_bytes = buffer_body("request", body).await?;
    let req_body = if is_json(&req_headers) {
        body_as_json(&req_bytes)
    } else {
        Value::Null
    };

    let response = next
        .run(Request::from_parts(parts, Body::from(req_bytes)))
        .await;

    let latency = start_time.elapsed();
    let status = response.status();

    let (parts, body) = response.into_parts();
    let res_bytes = buffer_body("response", body).await?;
    let res_body = if is_json(&parts.headers) && method != Method::GET {
        body_as_json(&res_bytes)
    } else {
        Value::Null
    };

    tracing::info!(
        method = %method,
        path = %uri.path(),
        query = uri.query().unwrap_or(""),
        x_request_id = %request_id,
        req_headers = ?redact_headers(&req_headers),
        req_body = %req_body,
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        res_body = %res_body,
        app_env = %APP_CONFIG.app_env,
        "HTTP request completed"
    );

    Ok(Response::from_parts(parts, Body::from(res_bytes)))
}

async fn buffer_body<B>(direction: &'static str, body: B) -> Result<Bytes, TrainingError>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|err| {
            TrainingError::validation("body", format!("failed to read {direction} body: {err}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn health_and_docs_are_skipped() {
        assert!(should_ignore_path("/health"));
        assert!(should_ignore_path("/health/"));
        assert!(should_ignore_path("/swagger-ui/index.html"));
        assert!(should_ignore_path("/api-docs/openapi.json"));
        assert!(!should_ignore_path("/api/v1/public/catalog"));
    }

    #[test]
    fn nested_tokens_are_redacted() {
        let body = json!({
            "email": "maria@example.com",
            "Token": "abc",
            "session": { "access_token": "xyz", "expires_in": 3600 },
            "items": [{ "secret": "s" }]
        });

        let redacted = redact(body);

        assert_eq!(redacted["email"], "maria@example.com");
        assert_eq!(redacted["Token"], REDACTED);
        assert_eq!(redacted["session"]["access_token"], REDACTED);
        assert_eq!(redacted["session"]["expires_in"], 3600);
        assert_eq!(redacted["items"][0]["secret"], REDACTED);
    }

    #[test]
    fn authorization_header_is_masked() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let filtered = redact_headers(&headers);

        assert_eq!(filtered[header::AUTHORIZATION], REDACTED);
        assert_eq!(filtered[header::ACCEPT], "application/json");
    }

    #[test]
    fn non_json_bodies_log_as_null() {
        assert_eq!(body_as_json(&Bytes::from_static(b"not json")), Value::Null);
    }
}
