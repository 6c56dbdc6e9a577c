use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use super::request_id::RequestId;

/// Log every request on the way in and its status on the way out
pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    tracing::info!(method = %method, uri = %uri, request_id = %request_id, "Request started");

    let start = Instant::now();
    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}
