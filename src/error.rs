use std::fmt;

use crate::document::EntityId;
use crate::lock::LockError;

/// Why a request was refused before anything was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A required field was absent or blank.
    MissingField(&'static str),
    DuplicateUsername(String),
    DuplicateEmail(String),
    DuplicateDiscordId(String),
    /// The invite code could not be redeemed.
    InvalidInvitation(InviteRejection),
    /// An invite with the same code already exists.
    DuplicateInviteCode(String),
    /// A field had a value outside its allowed range.
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingField(field) => write!(f, "missing required field: {}", field),
            Rejection::DuplicateUsername(name) => write!(f, "username already taken: {}", name),
            Rejection::DuplicateEmail(email) => write!(f, "email already registered: {}", email),
            Rejection::DuplicateDiscordId(id) => {
                write!(f, "discord id already registered: {}", id)
            }
            Rejection::InvalidInvitation(reason) => write!(f, "invitation invalid: {}", reason),
            Rejection::DuplicateInviteCode(code) => write!(f, "invite code already exists: {}", code),
            Rejection::InvalidField { field, reason } => write!(f, "invalid {}: {}", field, reason),
        }
    }
}

/// Reasons an invite code refuses a redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteRejection {
    NotFound(String),
    Exhausted(String),
    Expired(String),
}

impl fmt::Display for InviteRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InviteRejection::NotFound(code) => write!(f, "invite code {} does not exist", code),
            InviteRejection::Exhausted(code) => write!(f, "invite code {} has no uses left", code),
            InviteRejection::Expired(code) => write!(f, "invite code {} has expired", code),
        }
    }
}

/// Error type for every store, repository and redemption operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing a collection file failed for a reason other than "missing".
    StorageUnavailable { collection: String, message: String },
    /// The id does not exist in the collection.
    NotFound {
        collection: String,
        id: EntityId,
    },
    /// The request was refused; nothing was written.
    ValidationRejected(Rejection),
    /// A payload or stored entity could not be (de)serialized.
    Serde(String),
    /// A lock primitive was poisoned.
    LockPoisoned(String),
    /// The calling thread already holds the collection's lock.
    AlreadyLocked { collection: String },
}

impl StoreError {
    pub(crate) fn storage(collection: &str, err: impl fmt::Display) -> Self {
        StoreError::StorageUnavailable {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn not_found(collection: &str, id: EntityId) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id,
        }
    }

    /// Returns the rejection reason if this error is a validation failure.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            StoreError::ValidationRejected(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::StorageUnavailable {
                collection,
                message,
            } => write!(f, "storage unavailable for {}: {}", collection, message),
            StoreError::NotFound { collection, id } => {
                write!(f, "not found: {}:{}", collection, id)
            }
            StoreError::ValidationRejected(reason) => write!(f, "rejected: {}", reason),
            StoreError::Serde(msg) => write!(f, "serialization error: {}", msg),
            StoreError::LockPoisoned(msg) => write!(f, "lock poisoned: {}", msg),
            StoreError::AlreadyLocked { collection } => {
                write!(f, "{} is already locked by the calling thread", collection)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<Rejection> for StoreError {
    fn from(reason: Rejection) -> Self {
        StoreError::ValidationRejected(reason)
    }
}

impl From<InviteRejection> for StoreError {
    fn from(reason: InviteRejection) -> Self {
        StoreError::ValidationRejected(Rejection::InvalidInvitation(reason))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

impl From<LockError> for StoreError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Poisoned(name) => StoreError::LockPoisoned(name.to_string()),
            LockError::Reentrant(name) => StoreError::AlreadyLocked {
                collection: name.to_string(),
            },
        }
    }
}
