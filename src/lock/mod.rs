//! Per-collection locks serializing load-mutate-save cycles.
//!
//! `CollectionLocks` keeps one lock per `Document::COLLECTION`. Repository
//! operations hold it through a `CollectionGuard` for the whole
//! read-modify-write cycle, so two writers on the same file can no longer
//! interleave between the read and the write.

mod error;
mod guard;
mod table;

pub use error::LockError;
pub use guard::CollectionGuard;
pub use table::CollectionLocks;
