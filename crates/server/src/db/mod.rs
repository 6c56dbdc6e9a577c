mod handle;
mod memory;
mod mongo;
mod repository;
mod store;

pub use handle::StoreHandle;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use repository::ResourceRepository;
pub use store::{DocumentStore, StoreError};

use std::sync::Arc;

/// Connect to MongoDB and mark the handle ready.
///
/// A failed connection is logged and leaves the handle pending, so
/// store-backed routes keep answering 503 instead of the process exiting.
pub async fn connect(handle: StoreHandle, uri: String, database: String) {
    match MongoStore::connect(&uri, &database).await {
        Ok(store) => {
            handle.set(Arc::new(store));
            tracing::info!(database = %database, "MongoDB connected");
        }
        Err(e) => {
            tracing::error!(error = %e, "MongoDB connection failed, API stays unavailable");
        }
    }
}
