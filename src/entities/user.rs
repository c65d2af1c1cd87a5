use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::document::{DocumentStore, EntityId};
use crate::error::StoreError;
use crate::Document;

/// Role granted when neither the caller nor an invite code names one.
pub const DEFAULT_ROLE: &str = "member";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Banned,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "users", key = "users")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub discord_id: String,
    pub role: String,
    #[serde(default)]
    pub status: UserStatus,
    pub password: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub discord_id: String,
    pub role: String,
    pub status: UserStatus,
    pub password: String,
}

impl<S: DocumentStore> Collection<User, S> {
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_one(|user| user.username == username)
    }

    pub fn set_status(&self, id: EntityId, status: UserStatus) -> Result<User, StoreError> {
        self.update_with(id, |user| {
            user.status = status;
            Ok(())
        })
    }
}
