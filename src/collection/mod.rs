//! Collections - one generic repository for every entity type.
//!
//! `Collection<T>` implements list / insert / update / delete once; the
//! entity type supplies its file and array key through `Document`.
//!
//! ## Example
//!
//! ```ignore
//! use commons_store::{InMemoryDocumentStore, Store, Team};
//!
//! let store = Store::new(InMemoryDocumentStore::new());
//! let teams = store.collection::<Team>();
//! let team = teams.insert(&NewTeam::new("Owls", "alice"))?;
//! teams.update_by_id(team.id, &serde_json::json!({ "name": "Night Owls" }))?;
//! ```

mod fields;
mod loaded;
mod repository;

pub use repository::Collection;
