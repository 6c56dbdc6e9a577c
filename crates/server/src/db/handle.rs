use std::sync::{Arc, OnceLock};

use super::DocumentStore;

/// Shared slot for the store, filled once the connection succeeds.
///
/// This is the readiness state: empty means not ready, filled means ready
/// for the rest of the process lifetime. It never empties again.
#[derive(Clone, Default)]
pub struct StoreHandle {
    inner: Arc<OnceLock<Arc<dyn DocumentStore>>>,
}

impl StoreHandle {
    /// A handle that is not ready yet
    pub fn pending() -> Self {
        Self::default()
    }

    /// A handle that is ready immediately
    pub fn ready(store: Arc<dyn DocumentStore>) -> Self {
        let handle = Self::pending();
        handle.set(store);
        handle
    }

    /// Fill the slot. Returns `false` if a store was already set.
    pub fn set(&self, store: Arc<dyn DocumentStore>) -> bool {
        self.inner.set(store).is_ok()
    }

    pub fn get(&self) -> Option<Arc<dyn DocumentStore>> {
        self.inner.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn becomes_ready_once() {
        let handle = StoreHandle::pending();
        assert!(!handle.is_ready());
        assert!(handle.get().is_none());

        assert!(handle.set(Arc::new(MemoryStore::new())));
        assert!(handle.is_ready());

        assert!(!handle.set(Arc::new(MemoryStore::new())));
        assert!(handle.is_ready());
    }

    #[test]
    fn clones_share_state() {
        let handle = StoreHandle::pending();
        let observer = handle.clone();
        handle.set(Arc::new(MemoryStore::new()));
        assert!(observer.is_ready());
    }
}
