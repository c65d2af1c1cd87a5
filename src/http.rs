//! Framework-agnostic translation of store errors into HTTP-style responses.
//!
//! Route handlers wrap repository calls and turn failures into an
//! `ErrorResponse`; the actual HTTP server is wired by the consumer.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Status code plus JSON body for a failed store operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ErrorResponse {
    pub fn from_error(err: &StoreError) -> Self {
        let status = match err {
            StoreError::NotFound { .. } => 404,
            StoreError::ValidationRejected(_) => 422,
            StoreError::Serde(_) => 400,
            StoreError::StorageUnavailable { .. } => 500,
            StoreError::LockPoisoned(_) | StoreError::AlreadyLocked { .. } => 500,
        };
        let message = match err {
            // Storage details stay in the logs.
            StoreError::StorageUnavailable { .. }
            | StoreError::LockPoisoned(_)
            | StoreError::AlreadyLocked { .. } => {
                "storage failure".to_string()
            }
            StoreError::ValidationRejected(reason) => reason.to_string(),
            _ => err.to_string(),
        };
        Self {
            status,
            body: serde_json::json!({ "error": message }),
        }
    }
}

impl From<StoreError> for ErrorResponse {
    fn from(err: StoreError) -> Self {
        Self::from_error(&err)
    }
}
