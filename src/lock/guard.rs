use std::sync::Arc;

use tracing::warn;

use super::table::CollectionLock;

/// Holds zero or more collection locks and releases them on drop.
///
/// An empty guard is what an unguarded store hands out.
#[must_use = "the collection is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CollectionGuard {
    held: Vec<Arc<CollectionLock>>,
}

impl CollectionGuard {
    /// A guard that holds nothing.
    pub fn unguarded() -> Self {
        Self { held: Vec::new() }
    }

    pub(super) fn push(&mut self, lock: Arc<CollectionLock>) {
        self.held.push(lock);
    }

    /// Names of the collections this guard holds, in acquisition order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.held.iter().map(|lock| lock.collection())
    }

    pub fn is_held(&self) -> bool {
        !self.held.is_empty()
    }
}

impl Drop for CollectionGuard {
    fn drop(&mut self) {
        while let Some(lock) = self.held.pop() {
            if let Err(err) = lock.release() {
                warn!(collection = lock.collection(), %err, "unlock failed");
            }
        }
    }
}
