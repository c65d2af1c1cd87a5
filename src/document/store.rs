//! DocumentStore - load/save primitives for whole collection files.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::StoreError;

/// The top-level JSON object of a collection file.
pub type RawDocument = Map<String, Value>;

/// Where a loaded snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from an existing file.
    Stored,
    /// No file yet; an empty default was materialized.
    Missing,
    /// The file existed but was not a JSON object; an empty default was materialized.
    Corrupt,
}

/// A collection document as read at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: RawDocument,
    pub origin: LoadOrigin,
}

impl Snapshot {
    pub fn empty(origin: LoadOrigin) -> Self {
        Self {
            document: RawDocument::new(),
            origin,
        }
    }

    /// Parse file contents. Anything but a JSON object degrades to an empty
    /// document marked `Corrupt`.
    pub fn decode(collection: &str, bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(document)) => {
                debug!(collection, bytes = bytes.len(), "loaded collection");
                Self {
                    document,
                    origin: LoadOrigin::Stored,
                }
            }
            Ok(other) => {
                warn!(
                    collection,
                    kind = json_kind(&other),
                    "collection file is not an object, treating as empty"
                );
                Self::empty(LoadOrigin::Corrupt)
            }
            Err(err) => {
                warn!(collection, %err, "collection file is unreadable JSON, treating as empty");
                Self::empty(LoadOrigin::Corrupt)
            }
        }
    }

    /// Remove and return the entity array under `key`.
    ///
    /// An absent key yields an empty list. A key holding something other than
    /// an array also yields an empty list, with a warning.
    pub fn take_entries(&mut self, key: &str) -> Vec<Value> {
        match self.document.remove(key) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                warn!(
                    key,
                    kind = json_kind(&other),
                    "collection key does not hold an array, treating as empty"
                );
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// The entity array under `key`, empty when absent or malformed.
    pub fn entries(&self, key: &str) -> &[Value] {
        match self.document.get(key) {
            Some(Value::Array(entries)) => entries,
            _ => &[],
        }
    }

    /// Put `entries` back under `key`, keeping every other top-level field.
    pub fn into_document(mut self, key: &str, entries: Vec<Value>) -> RawDocument {
        self.document.insert(key.to_string(), Value::Array(entries));
        self.document
    }
}

/// Abstract whole-document storage, one document per collection name.
pub trait DocumentStore: Send + Sync {
    /// Read the named collection.
    ///
    /// A missing or malformed file is not an error: it yields an empty
    /// document whose `origin` says which case occurred.
    fn load(&self, collection: &str) -> Result<Snapshot, StoreError>;

    /// Replace the named collection with `document` in one write.
    fn save(&self, collection: &str, document: &RawDocument) -> Result<(), StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn load(&self, collection: &str) -> Result<Snapshot, StoreError> {
        (**self).load(collection)
    }

    fn save(&self, collection: &str, document: &RawDocument) -> Result<(), StoreError> {
        (**self).save(collection, document)
    }
}

/// Serialize a document the way collection files are written.
pub(crate) fn encode(document: &RawDocument) -> Result<Vec<u8>, StoreError> {
    let mut bytes = serde_json::to_vec_pretty(document)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
