//! Store - a document store, its collection locks, and typed collection access.

use std::sync::Arc;

use crate::collection::Collection;
use crate::config::{StoreConfig, StoreOptions};
use crate::document::{Document, DocumentStore, FileDocumentStore};
use crate::error::StoreError;
use crate::lock::{CollectionGuard, CollectionLocks};

/// Shared handle over a `DocumentStore` plus the locks guarding its collections.
///
/// Clones share the same documents and the same lock table, so every
/// `Collection` handed out from any clone contends on the same per-collection
/// lock.
pub struct Store<S> {
    documents: Arc<S>,
    locks: CollectionLocks,
    options: StoreOptions,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            locks: self.locks.clone(),
            options: self.options,
        }
    }
}

impl Store<FileDocumentStore> {
    /// A file-backed store configured from `config`.
    pub fn open(config: &StoreConfig) -> Self {
        Store::with_options(FileDocumentStore::new(&config.data_dir), config.options())
    }
}

impl<S: DocumentStore> Store<S> {
    /// A store with per-collection locking enabled.
    pub fn new(documents: S) -> Self {
        Self::with_options(documents, StoreOptions::default())
    }

    pub fn with_options(documents: S, options: StoreOptions) -> Self {
        Self {
            documents: Arc::new(documents),
            locks: CollectionLocks::new(),
            options,
        }
    }

    /// Typed repository for the collection bound to `T`.
    pub fn collection<T: Document>(&self) -> Collection<T, S> {
        Collection::new(self.clone())
    }

    pub fn documents(&self) -> &S {
        &self.documents
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Hold the locks of the named collections until the guard drops.
    ///
    /// Returns an empty guard when locking is disabled. Fails with
    /// `AlreadyLocked` if the calling thread already holds one of them.
    pub fn guard(&self, collections: &[&'static str]) -> Result<CollectionGuard, StoreError> {
        if !self.options.lock {
            return Ok(CollectionGuard::unguarded());
        }
        Ok(self.locks.acquire(collections)?)
    }
}
