//! Documents - whole-file JSON collections.
//!
//! Each collection lives in one file holding a single top-level array under a
//! fixed key (`{ "users": [ ... ] }`). The `DocumentStore` trait loads and saves
//! those files whole; the `Document` trait binds an entity type to its file and
//! key once, so every accessor of a file agrees on the key.
//!
//! ## Example
//!
//! ```ignore
//! use commons_store::{Document, EntityId};
//!
//! #[derive(Clone, Serialize, Deserialize, Document)]
//! #[document(collection = "teams", key = "teams")]
//! struct Team {
//!     pub id: EntityId,
//!     pub name: String,
//! }
//! ```

mod file;
mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};

/// Integer identifier, unique within one collection.
pub type EntityId = u64;

/// Trait for entity types stored in a collection file.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection (file stem) this type is stored in, e.g. `"users"`.
    const COLLECTION: &'static str;

    /// The top-level key holding the entity array inside the file.
    const ARRAY_KEY: &'static str;

    /// Returns the repository-assigned identifier.
    fn id(&self) -> EntityId;
}

pub use file::FileDocumentStore;
pub use in_memory::InMemoryDocumentStore;
pub use store::{DocumentStore, LoadOrigin, RawDocument, Snapshot};
