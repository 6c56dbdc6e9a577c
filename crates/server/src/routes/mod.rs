pub mod health;
pub mod landing;
pub mod metrics;
mod resource;

use axum::{Extension, Router, routing::get};
use shop_core::ResourceKind;

use crate::db::StoreHandle;
use crate::error::AppError;

/// Build CRUD routes for one resource under `/api/{collection}`
pub fn resource_routes(kind: ResourceKind) -> Router<StoreHandle> {
    let base = format!("/api/{}", kind.collection());

    Router::new()
        .route(
            &base,
            get(resource::list)
                .post(resource::create)
                .fallback(fallback),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(resource::read)
                .put(resource::replace)
                .patch(resource::patch)
                .delete(resource::delete)
                .fallback(fallback),
        )
        .layer(Extension(kind))
}

/// Any unmatched path or method
pub async fn fallback() -> AppError {
    AppError::route_not_found()
}
