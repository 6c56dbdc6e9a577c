//! Readiness gate
//!
//! Every `/api` request fails with 503 until the store connection is up.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::db::StoreHandle;
use crate::error::AppError;

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

pub async fn readiness_middleware(
    State(store): State<StoreHandle>,
    request: Request,
    next: Next,
) -> Response {
    if is_api_path(request.uri().path()) && !store.is_ready() {
        tracing::debug!(path = %request.uri().path(), "Store not ready, rejecting request");
        return AppError::not_ready().into_response();
    }

    next.run(request).await
}
