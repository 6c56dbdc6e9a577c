//! JSON body parsing
//!
//! Bodies declared as JSON are read and parsed before routing, so a
//! malformed payload fails with 400 ahead of any gate or handler. Handlers
//! pick the parsed value up with the [`JsonBody`] extractor.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value as JsonValue;

use crate::error::AppError;

/// Largest accepted request body
pub const BODY_LIMIT: usize = 100 * 1024;

/// Parsed request body. Requests without a JSON body yield an empty object.
#[derive(Debug, Clone)]
pub struct JsonBody(pub JsonValue);

impl<S> FromRequestParts<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .remove::<JsonBody>()
            .unwrap_or_else(|| JsonBody(JsonValue::Object(Default::default()))))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Parse JSON request bodies ahead of routing
pub async fn json_body_middleware(request: Request<Body>, next: Next) -> Response {
    if !is_json(request.headers()) {
        return next.run(request).await;
    }

    match parse(request).await {
        Ok(request) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

async fn parse(request: Request<Body>) -> Result<Request<Body>, AppError> {
    if declared_length(request.headers()).is_some_and(|len| len > BODY_LIMIT) {
        return Err(AppError::PayloadTooLarge);
    }

    let (mut parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|_| AppError::PayloadTooLarge)?;

    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        JsonValue::Object(Default::default())
    } else {
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "Malformed JSON body");
            AppError::BadRequest("Invalid JSON body".to_string())
        })?
    };

    parts.extensions.insert(JsonBody(value));
    Ok(Request::from_parts(parts, Body::from(bytes)))
}
