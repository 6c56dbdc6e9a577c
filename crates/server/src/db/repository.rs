use std::sync::Arc;

use serde_json::Value as JsonValue;
use shop_core::{DocumentId, FindSpec, JsonMap, ResourceKind, document_to_json, json_to_document};

use super::{DocumentStore, StoreError};

/// CRUD operations for one resource kind, speaking JSON on both sides
#[derive(Clone)]
pub struct ResourceRepository {
    store: Arc<dyn DocumentStore>,
    kind: ResourceKind,
}

impl ResourceRepository {
    pub fn new(store: Arc<dyn DocumentStore>, kind: ResourceKind) -> Self {
        Self { store, kind }
    }

    /// Create a new document
    pub async fn create(&self, fields: JsonMap) -> Result<DocumentId, StoreError> {
        self.store
            .insert_one(self.kind.collection(), json_to_document(fields))
            .await
    }

    /// Get a document by ID
    pub async fn get(&self, id: DocumentId) -> Result<Option<JsonValue>, StoreError> {
        let doc = self.store.find_one(self.kind.collection(), id).await?;
        Ok(doc.map(document_to_json))
    }

    /// List documents matching a find spec
    pub async fn list(&self, spec: FindSpec) -> Result<Vec<JsonValue>, StoreError> {
        let docs = self.store.find(self.kind.collection(), spec).await?;
        Ok(docs.into_iter().map(document_to_json).collect())
    }

    /// Merge fields into a document. Returns `false` if no document matched.
    pub async fn update(&self, id: DocumentId, fields: JsonMap) -> Result<bool, StoreError> {
        let matched = self
            .store
            .update_one(self.kind.collection(), id, json_to_document(fields))
            .await?;
        Ok(matched > 0)
    }

    /// Delete a document. Returns `false` if it did not exist.
    pub async fn delete(&self, id: DocumentId) -> Result<bool, StoreError> {
        let deleted = self.store.delete_one(self.kind.collection(), id).await?;
        Ok(deleted > 0)
    }
}
