//! CRUD handlers shared by every resource kind

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shop_core::{
    CreatedBody, DeleteStyle, DocumentId, FindSpec, ListParams, MessageBody, ProductList,
    ResourceKind, resource::validate_update,
};

use crate::db::{ResourceRepository, StoreHandle};
use crate::error::AppError;
use crate::middleware::JsonBody;

fn repository(store: &StoreHandle, kind: ResourceKind) -> Result<ResourceRepository, AppError> {
    let store = store.get().ok_or_else(AppError::not_ready)?;
    Ok(ResourceRepository::new(store, kind))
}

/// GET /api/{resource} - List documents
///
/// Products honour `category`, `minPrice`, `sort` and `fields`, and are
/// wrapped as `{count, products}`. Items are returned as a bare array.
pub async fn list(
    State(store): State<StoreHandle>,
    Extension(kind): Extension<ResourceKind>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, AppError> {
    let repo = repository(&store, kind)?;

    if !kind.supports_query() {
        let docs = repo.list(FindSpec::all()).await?;
        return Ok(Json(docs).into_response());
    }

    // An undecodable query string lists everything
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Ignoring undecodable list query");
        Vec::new()
    });
    let params = ListParams::from_pairs(pairs);
    let docs = repo.list(params.to_find_spec()).await?;
    Ok(Json(ProductList::new(docs)).into_response())
}

/// GET /api/{resource}/{id} - Read a document
pub async fn read(
    State(store): State<StoreHandle>,
    Extension(kind): Extension<ResourceKind>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repo = repository(&store, kind)?;
    let id: DocumentId = id.parse()?;

    match repo.get(id).await? {
        Some(doc) => Ok(Json(doc)),
        None => Err(AppError::NotFound(kind.not_found_message().to_string())),
    }
}

/// POST /api/{resource} - Create a document
pub async fn create(
    State(store): State<StoreHandle>,
    Extension(kind): Extension<ResourceKind>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let repo = repository(&store, kind)?;
    let fields = kind.validate_create(body)?;
    let id = repo.create(fields).await?;

    tracing::info!(collection = kind.collection(), id = %id, "Document created");

    Ok((StatusCode::CREATED, Json(CreatedBody { id: id.to_hex() })))
}

/// PUT /api/{resource}/{id} - Update a document's fields
pub async fn replace(
    State(store): State<StoreHandle>,
    Extension(kind): Extension<ResourceKind>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    merge_fields(&store, kind, &id, body).await?;
    Ok(Json(MessageBody::new("Updated successfully")))
}

/// PATCH /api/{resource}/{id} - Partially update a document
pub async fn patch(
    State(store): State<StoreHandle>,
    Extension(kind): Extension<ResourceKind>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    merge_fields(&store, kind, &id, body).await?;
    Ok(Json(MessageBody::new("Partially updated")))
}

/// Shared by PUT and PATCH: both merge the supplied fields with `$set`,
/// leaving unmentioned fields in place.
async fn merge_fields(
    store: &StoreHandle,
    kind: ResourceKind,
    id: &str,
    body: serde_json::Value,
) -> Result<(), AppError> {
    let repo = repository(store, kind)?;
    let invalid = || AppError::BadRequest("Invalid ID or data".to_string());

    let id: DocumentId = id.parse().map_err(|_| invalid())?;
    let fields = validate_update(body).map_err(|_| invalid())?;

    if repo.update(id, fields).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(kind.not_found_message().to_string()))
    }
}

/// DELETE /api/{resource}/{id} - Delete a document
pub async fn delete(
    State(store): State<StoreHandle>,
    Extension(kind): Extension<ResourceKind>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let repo = repository(&store, kind)?;
    let id: DocumentId = id.parse()?;

    if !repo.delete(id).await? {
        return Err(AppError::NotFound(kind.not_found_message().to_string()));
    }

    tracing::info!(collection = kind.collection(), id = %id, "Document deleted");

    Ok(match kind.delete_style() {
        DeleteStyle::NoContent => StatusCode::NO_CONTENT.into_response(),
        DeleteStyle::Message => Json(MessageBody::new("Deleted successfully")).into_response(),
    })
}
