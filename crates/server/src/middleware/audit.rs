//! Audit logging middleware for mutations

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use super::auth::is_mutating;
use super::request_id::RequestId;

/// Resource collection and document id named by an `/api` path
fn audit_target(path: &str) -> (Option<&str>, Option<&str>) {
    let mut segments = path
        .strip_prefix("/api/")
        .unwrap_or_default()
        .split('/')
        .filter(|s| !s.is_empty());
    (segments.next(), segments.next())
}

/// Log every mutating request with its target document and outcome
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    if !is_mutating(request.method()) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    let (resource, document) = audit_target(&path);
    tracing::info!(
        target: "audit",
        request_id = %request_id,
        method = %method,
        resource = resource.unwrap_or("-"),
        document = document.unwrap_or("-"),
        status = response.status().as_u16(),
        "Mutation request"
    );

    response
}
