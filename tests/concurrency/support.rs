//! Document stores that force a particular interleaving.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

use commons_store::{DocumentStore, RawDocument, Snapshot, StoreError};

/// Holds the first `parties` loads of one collection until all of them have
/// read, so every caller works from the same snapshot.
pub struct LockstepLoads<S> {
    inner: S,
    collection: &'static str,
    parties: usize,
    loads: AtomicUsize,
    barrier: Barrier,
}

impl<S> LockstepLoads<S> {
    pub fn new(inner: S, collection: &'static str, parties: usize) -> Self {
        Self {
            inner,
            collection,
            parties,
            loads: AtomicUsize::new(0),
            barrier: Barrier::new(parties),
        }
    }
}

impl<S: DocumentStore> DocumentStore for LockstepLoads<S> {
    fn load(&self, collection: &str) -> Result<Snapshot, StoreError> {
        let snapshot = self.inner.load(collection)?;
        if collection == self.collection && self.loads.fetch_add(1, Ordering::SeqCst) < self.parties
        {
            self.barrier.wait();
        }
        Ok(snapshot)
    }

    fn save(&self, collection: &str, document: &RawDocument) -> Result<(), StoreError> {
        self.inner.save(collection, document)
    }
}
