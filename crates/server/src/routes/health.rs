//! Health check endpoint

use axum::Json;
use shop_core::StatusBody;

/// GET /health, GET /api/health
pub async fn check() -> Json<StatusBody> {
    Json(StatusBody::ok())
}
