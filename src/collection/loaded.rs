//! Loaded - one collection's entries as read at the start of an operation.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use super::fields::{entry_id, next_id, shallow_merge, timestamp, to_fields, ID, UPDATED_AT};
use crate::document::{Document, EntityId, RawDocument, Snapshot};
use crate::error::StoreError;

/// The working set of a read-modify-write cycle.
///
/// Entries stay raw JSON so fields the entity type does not know about, and
/// entries that fail to decode, survive a save untouched.
pub(crate) struct Loaded<T> {
    snapshot: Snapshot,
    entries: Vec<Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Loaded<T> {
    pub(crate) fn new(mut snapshot: Snapshot) -> Self {
        let entries = snapshot.take_entries(T::ARRAY_KEY);
        Self {
            snapshot,
            entries,
            _marker: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn next_id(&self) -> Result<EntityId, StoreError> {
        next_id(&self.entries)
    }

    fn decode(&self, index: usize) -> Option<T> {
        let entry = self.entries.get(index)?;
        match serde_json::from_value::<T>(entry.clone()) {
            Ok(entity) => Some(entity),
            Err(err) => {
                warn!(
                    collection = T::COLLECTION,
                    index,
                    id = ?entry_id(entry),
                    %err,
                    "skipping entry that does not decode"
                );
                None
            }
        }
    }

    /// Every entry that decodes, in stored order.
    pub(crate) fn entities(&self) -> Vec<T> {
        (0..self.entries.len())
            .filter_map(|index| self.decode(index))
            .collect()
    }

    /// First decodable entry matching `predicate`, with its position.
    pub(crate) fn position<F>(&self, predicate: F) -> Option<(usize, T)>
    where
        F: Fn(&T) -> bool,
    {
        (0..self.entries.len())
            .filter_map(|index| self.decode(index).map(|entity| (index, entity)))
            .find(|(_, entity)| predicate(entity))
    }

    pub(crate) fn position_of(&self, id: EntityId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry_id(entry) == Some(id))
    }

    /// Decode the entry at `index`, failing loudly instead of skipping it.
    pub(crate) fn entity_at(&self, index: usize) -> Result<T, StoreError> {
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| StoreError::Serde(format!("no entry at position {}", index)))?;
        serde_json::from_value(entry.clone()).map_err(|err| {
            StoreError::Serde(format!(
                "stored {} entry {:?} does not decode: {}",
                T::COLLECTION,
                entry_id(entry),
                err
            ))
        })
    }

    pub(crate) fn push(&mut self, entity: &T) -> Result<(), StoreError> {
        self.entries.push(serde_json::to_value(entity)?);
        Ok(())
    }

    /// Shallow-merge `patch` over the entry at `index` and stamp `updated_at`.
    ///
    /// The id never changes. Nothing is modified if the merged entry no longer
    /// decodes into `T`.
    pub(crate) fn apply(
        &mut self,
        index: usize,
        mut patch: Map<String, Value>,
        at: DateTime<Utc>,
    ) -> Result<T, StoreError> {
        let mut merged = match self.entries.get(index) {
            Some(Value::Object(existing)) => existing.clone(),
            _ => Map::new(),
        };
        patch.remove(ID);
        shallow_merge(&mut merged, patch);
        merged.insert(UPDATED_AT.to_string(), timestamp(at)?);

        let merged = Value::Object(merged);
        let entity: T = serde_json::from_value(merged.clone())?;
        self.entries[index] = merged;
        Ok(entity)
    }

    /// Write a modified entity back over the entry at `index`.
    ///
    /// Every field the stored entity serialized is dropped before the new
    /// value is merged in, so a field the type skips when empty (an `Option`
    /// set to `None`) is cleared rather than left at its old value. Fields
    /// the type does not know about are kept.
    pub(crate) fn replace(
        &mut self,
        index: usize,
        entity: &T,
        at: DateTime<Utc>,
    ) -> Result<T, StoreError> {
        let owned = to_fields(&self.entity_at(index)?)?;
        if let Some(Value::Object(existing)) = self.entries.get_mut(index) {
            for key in owned.keys().filter(|key| key.as_str() != ID) {
                existing.remove(key);
            }
        }
        self.apply(index, to_fields(entity)?, at)
    }

    /// Drop every entry carrying `id`. Returns whether anything was removed.
    pub(crate) fn remove(&mut self, id: EntityId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry_id(entry) != Some(id));
        self.entries.len() != before
    }

    pub(crate) fn into_document(self) -> RawDocument {
        self.snapshot.into_document(T::ARRAY_KEY, self.entries)
    }
}
