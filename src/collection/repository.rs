//! Collection - typed CRUD over one collection file.

use std::marker::PhantomData;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::fields::{shallow_merge, timestamp, to_fields, CREATED_AT, ID};
use super::loaded::Loaded;
use crate::document::{Document, DocumentStore, EntityId, FileDocumentStore};
use crate::error::StoreError;
use crate::lock::CollectionGuard;
use crate::store::Store;

/// Typed repository over the collection bound to `T`.
///
/// Every operation re-reads the collection file; there is no cache. Mutating
/// operations run their load-mutate-save cycle under the collection lock
/// unless the store was built with `StoreOptions::no_lock()`.
pub struct Collection<T, S = FileDocumentStore> {
    store: Store<S>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> Clone for Collection<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S> Collection<T, S>
where
    T: Document,
    S: DocumentStore,
{
    pub fn new(store: Store<S>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// The collection name (file stem).
    pub fn name(&self) -> &'static str {
        T::COLLECTION
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Hold this collection's lock until the guard drops.
    ///
    /// The lock is not re-entrant: while the guard is alive, `insert`,
    /// `update_by_id`, `update_with` and `delete_by_id` on this collection
    /// fail with `StoreError::AlreadyLocked` on the holding thread. Reads are
    /// unaffected.
    pub fn guard(&self) -> Result<CollectionGuard, StoreError> {
        self.store.guard(&[T::COLLECTION])
    }

    /// All entities, in stored order. Empty when the file is missing or corrupt.
    pub fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.load()?.entities())
    }

    pub fn get(&self, id: EntityId) -> Result<Option<T>, StoreError> {
        self.find_one(|entity| entity.id() == id)
    }

    /// Entities matching `predicate` (linear scan).
    pub fn find<F>(&self, predicate: F) -> Result<Vec<T>, StoreError>
    where
        F: Fn(&T) -> bool,
    {
        let mut entities = self.list()?;
        entities.retain(|entity| predicate(entity));
        Ok(entities)
    }

    pub fn find_one<F>(&self, predicate: F) -> Result<Option<T>, StoreError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.load()?.position(predicate).map(|(_, entity)| entity))
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list()?.len())
    }

    /// Store a new entity built from `fields`.
    ///
    /// The repository assigns `id` (`max(existing ids, 0) + 1`) and
    /// `created_at`; caller-supplied values for either are ignored.
    pub fn insert<P>(&self, fields: &P) -> Result<T, StoreError>
    where
        P: Serialize + ?Sized,
    {
        let _guard = self.guard()?;
        self.insert_held(fields)
    }

    /// Shallow-merge `patch` over the entity with `id` and stamp `updated_at`.
    ///
    /// Fails with `NotFound` if no entity has that id.
    pub fn update_by_id<P>(&self, id: EntityId, patch: &P) -> Result<T, StoreError>
    where
        P: Serialize + ?Sized,
    {
        let patch = to_fields(patch)?;
        let _guard = self.guard()?;

        let mut loaded = self.load()?;
        let index = loaded
            .position_of(id)
            .ok_or_else(|| StoreError::not_found(T::COLLECTION, id))?;
        let entity = loaded.apply(index, patch, Utc::now())?;
        self.commit(loaded)?;

        debug!(collection = T::COLLECTION, id, "updated");
        Ok(entity)
    }

    /// Apply `change` to the typed entity with `id` and save it.
    ///
    /// An error from `change` aborts the operation without writing.
    pub fn update_with<F>(&self, id: EntityId, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T) -> Result<(), StoreError>,
    {
        let _guard = self.guard()?;
        self.update_with_held(id, change)
    }

    /// Remove the entity with `id`. Returns `false` if there was none.
    pub fn delete_by_id(&self, id: EntityId) -> Result<bool, StoreError> {
        let _guard = self.guard()?;

        let mut loaded = self.load()?;
        if !loaded.remove(id) {
            debug!(collection = T::COLLECTION, id, "delete: not found");
            return Ok(false);
        }
        self.commit(loaded)?;

        debug!(collection = T::COLLECTION, id, "deleted");
        Ok(true)
    }

    // ------------------------------------------------------------------------
    // Variants for callers already holding this collection's guard
    // ------------------------------------------------------------------------

    pub(crate) fn insert_held<P>(&self, fields: &P) -> Result<T, StoreError>
    where
        P: Serialize + ?Sized,
    {
        let mut fields = to_fields(fields)?;
        fields.remove(ID);
        fields.remove(CREATED_AT);

        let mut loaded = self.load()?;
        let id = loaded.next_id()?;

        let mut entry = serde_json::Map::new();
        entry.insert(ID.to_string(), Value::from(id));
        entry.insert(CREATED_AT.to_string(), timestamp(Utc::now())?);
        shallow_merge(&mut entry, fields);

        let entity: T = serde_json::from_value(Value::Object(entry))?;
        loaded.push(&entity)?;
        let total = loaded.len();
        self.commit(loaded)?;

        debug!(collection = T::COLLECTION, id, total, "inserted");
        Ok(entity)
    }

    pub(crate) fn update_with_held<F>(&self, id: EntityId, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T) -> Result<(), StoreError>,
    {
        let mut loaded = self.load()?;
        let index = loaded
            .position_of(id)
            .ok_or_else(|| StoreError::not_found(T::COLLECTION, id))?;
        let mut entity = loaded.entity_at(index)?;
        change(&mut entity)?;
        let entity = loaded.replace(index, &entity, Utc::now())?;
        self.commit(loaded)?;

        debug!(collection = T::COLLECTION, id, "updated");
        Ok(entity)
    }

    pub(crate) fn load(&self) -> Result<Loaded<T>, StoreError> {
        let snapshot = self.store.documents().load(T::COLLECTION)?;
        Ok(Loaded::new(snapshot))
    }

    pub(crate) fn commit(&self, loaded: Loaded<T>) -> Result<(), StoreError> {
        self.store
            .documents()
            .save(T::COLLECTION, &loaded.into_document())
    }
}
