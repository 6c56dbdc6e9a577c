use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{Document, doc},
    options::FindOptions,
};
use shop_core::{DocumentId, FindSpec};

use super::{DocumentStore, StoreError};

/// MongoDB-backed document store
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Open a client and ping the server so a bad URI or unreachable
    /// host fails here rather than on the first request.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: &str, spec: FindSpec) -> Result<Vec<Document>, StoreError> {
        let mut options = FindOptions::default();
        options.sort = spec.sort;
        options.projection = spec.projection;

        let cursor = self
            .collection(collection)
            .find(spec.filter, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let filter = doc! { "_id": id.object_id() };
        Ok(self.collection(collection).find_one(filter, None).await?)
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<DocumentId, StoreError> {
        let result = self.collection(collection).insert_one(document, None).await?;
        result
            .inserted_id
            .as_object_id()
            .map(DocumentId::from)
            .ok_or_else(|| {
                StoreError::Backend(format!("unexpected inserted id: {}", result.inserted_id))
            })
    }

    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id.object_id() }, doc! { "$set": fields }, None)
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id.object_id() }, None)
            .await?;
        Ok(result.deleted_count)
    }
}
