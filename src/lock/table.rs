use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, ThreadId};

use super::{CollectionGuard, LockError};

/// Exclusive hold on one collection file, kept across document-store calls.
///
/// The owning thread is recorded so a nested acquisition from the same thread
/// fails with `Reentrant` instead of waiting on itself.
#[derive(Debug)]
pub(crate) struct CollectionLock {
    collection: &'static str,
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
}

impl CollectionLock {
    fn new(collection: &'static str) -> Self {
        Self {
            collection,
            owner: Mutex::new(None),
            released: Condvar::new(),
        }
    }

    pub(crate) fn collection(&self) -> &'static str {
        self.collection
    }

    fn acquire(&self) -> Result<(), LockError> {
        let me = thread::current().id();
        let mut owner = self
            .owner
            .lock()
            .map_err(|_| LockError::Poisoned(self.collection))?;
        loop {
            let holder = *owner;
            match holder {
                None => break,
                Some(holder) if holder == me => return Err(LockError::Reentrant(self.collection)),
                Some(_) => {
                    owner = self
                        .released
                        .wait(owner)
                        .map_err(|_| LockError::Poisoned(self.collection))?;
                }
            }
        }
        *owner = Some(me);
        Ok(())
    }

    pub(crate) fn release(&self) -> Result<(), LockError> {
        let mut owner = self
            .owner
            .lock()
            .map_err(|_| LockError::Poisoned(self.collection))?;
        if owner.take().is_some() {
            self.released.notify_one();
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn is_held(&self) -> bool {
        self.owner.lock().map(|owner| owner.is_some()).unwrap_or(true)
    }
}

/// Lock table keyed by collection name, created lazily.
///
/// Clones share the table, so every `Store` clone and every `Collection`
/// handed out from it contend on the same lock per file.
#[derive(Clone, Default)]
pub struct CollectionLocks {
    table: Arc<Mutex<HashMap<&'static str, Arc<CollectionLock>>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock_for(&self, collection: &'static str) -> Result<Arc<CollectionLock>, LockError> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| LockError::Poisoned("lock table"))?;
        Ok(Arc::clone(
            table
                .entry(collection)
                .or_insert_with(|| Arc::new(CollectionLock::new(collection))),
        ))
    }

    /// Lock every named collection, blocking until all are held.
    ///
    /// Names are taken in sorted order so two operations spanning the same
    /// collections cannot deadlock; duplicates are locked once. If any
    /// acquisition fails the ones already taken are released.
    pub fn acquire(&self, collections: &[&'static str]) -> Result<CollectionGuard, LockError> {
        let mut names = collections.to_vec();
        names.sort_unstable();
        names.dedup();

        let mut guard = CollectionGuard::unguarded();
        for name in names {
            let lock = self.lock_for(name)?;
            lock.acquire()?;
            guard.push(lock);
        }
        Ok(guard)
    }
}
