//! Field-level helpers shared by every collection: id assignment and shallow merge.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::EntityId;
use crate::error::StoreError;

pub(crate) const ID: &str = "id";
pub(crate) const CREATED_AT: &str = "created_at";
pub(crate) const UPDATED_AT: &str = "updated_at";

/// The id of a stored entry, if it has an integer one.
pub(crate) fn entry_id(entry: &Value) -> Option<EntityId> {
    entry.get(ID).and_then(Value::as_u64)
}

/// `max(existing ids, 0) + 1`. Fails when the largest stored id is `u64::MAX`.
pub(crate) fn next_id(entries: &[Value]) -> Result<EntityId, StoreError> {
    let max = entries.iter().filter_map(entry_id).max().unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| StoreError::Serde(format!("stored id {} leaves no next id", max)))
}

/// Serialize a caller payload into a field map.
pub(crate) fn to_fields<P: Serialize + ?Sized>(payload: &P) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(payload)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Serde(format!(
            "expected an object of fields, got {}",
            other
        ))),
    }
}

/// Copy every field of `patch` over `base`; patch fields win.
pub(crate) fn shallow_merge(base: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        base.insert(key, value);
    }
}

pub(crate) fn timestamp(at: DateTime<Utc>) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(at)?)
}
