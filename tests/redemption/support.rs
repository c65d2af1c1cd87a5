//! Shared fixtures for redemption tests.

use commons_store::{
    DocumentStore, InMemoryDocumentStore, RawDocument, RedemptionService, Snapshot, Store,
    StoreError,
};

pub fn service() -> RedemptionService<InMemoryDocumentStore> {
    RedemptionService::new(Store::new(InMemoryDocumentStore::new()))
}

/// Document store whose saves to one collection always fail.
pub struct FailingSaves<S> {
    inner: S,
    collection: &'static str,
}

impl<S> FailingSaves<S> {
    pub fn new(inner: S, collection: &'static str) -> Self {
        Self { inner, collection }
    }
}

impl<S: DocumentStore> DocumentStore for FailingSaves<S> {
    fn load(&self, collection: &str) -> Result<Snapshot, StoreError> {
        self.inner.load(collection)
    }

    fn save(&self, collection: &str, document: &RawDocument) -> Result<(), StoreError> {
        if collection == self.collection {
            return Err(StoreError::StorageUnavailable {
                collection: collection.to_string(),
                message: "disk full".into(),
            });
        }
        self.inner.save(collection, document)
    }
}
