//! InMemoryDocumentStore - byte-map document store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::store::{encode, DocumentStore, LoadOrigin, RawDocument, Snapshot};
use crate::error::StoreError;

/// In-memory document store keyed by collection name.
///
/// Documents are kept as the exact bytes a file store would write, so
/// malformed contents can be planted with `put_raw`. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a collection's bytes verbatim.
    pub fn put_raw(&self, collection: &str, bytes: impl Into<Vec<u8>>) -> Result<(), StoreError> {
        let mut files = self
            .files
            .write()
            .map_err(|_| StoreError::LockPoisoned("document map".into()))?;
        files.insert(collection.to_string(), bytes.into());
        Ok(())
    }

    /// The bytes currently stored for a collection.
    pub fn raw(&self, collection: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let files = self
            .files
            .read()
            .map_err(|_| StoreError::LockPoisoned("document map".into()))?;
        Ok(files.get(collection).cloned())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self, collection: &str) -> Result<Snapshot, StoreError> {
        match self.raw(collection)? {
            Some(bytes) => Ok(Snapshot::decode(collection, &bytes)),
            None => {
                debug!(collection, "no collection document yet, starting empty");
                Ok(Snapshot::empty(LoadOrigin::Missing))
            }
        }
    }

    fn save(&self, collection: &str, document: &RawDocument) -> Result<(), StoreError> {
        let bytes = encode(document)?;
        self.put_raw(collection, bytes)
    }
}
