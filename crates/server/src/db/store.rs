use async_trait::async_trait;
use mongodb::bson::Document;
use shop_core::{DocumentId, FindSpec};
use thiserror::Error;

/// Failures reported by a document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write because of its content
    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("store error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            mongodb::error::ErrorKind::Write(_) => StoreError::Rejected(err.to_string()),
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Collection-scoped document operations.
///
/// Every method is a single atomic store call; callers never compose them
/// into multi-step transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return all documents matching the filter, sorted and projected as asked
    async fn find(&self, collection: &str, spec: FindSpec) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a document and return its newly assigned id
    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<DocumentId, StoreError>;

    /// Merge `fields` into the document (`$set`); returns the matched count
    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<u64, StoreError>;

    /// Returns the deleted count
    async fn delete_one(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError>;
}
