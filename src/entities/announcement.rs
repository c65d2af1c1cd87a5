use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::collection::Collection;
use crate::document::{DocumentStore, EntityId};
use crate::error::StoreError;
use crate::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "announcements", key = "announcements")]
pub struct Announcement {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub body: String,
    pub author: String,
    pub pinned: bool,
}

impl NewAnnouncement {
    pub fn new(title: impl Into<String>, body: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: author.into(),
            pinned: false,
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

impl<S: DocumentStore> Collection<Announcement, S> {
    pub fn post(&self, announcement: &NewAnnouncement) -> Result<Announcement, StoreError> {
        require("title", &announcement.title)?;
        require("author", &announcement.author)?;
        self.insert(announcement)
    }

    /// Pinned announcements first, then newest first.
    pub fn feed(&self) -> Result<Vec<Announcement>, StoreError> {
        let mut announcements = self.list()?;
        announcements.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(announcements)
    }
}
