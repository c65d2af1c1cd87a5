use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::collection::Collection;
use crate::document::{DocumentStore, EntityId};
use crate::error::{Rejection, StoreError};
use crate::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "teams", key = "teams")]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub captain: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Team {
    pub fn has_member(&self, username: &str) -> bool {
        self.members.iter().any(|member| member == username)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTeam {
    pub name: String,
    pub captain: String,
    pub members: Vec<String>,
}

impl NewTeam {
    /// A team whose only member is its captain.
    pub fn new(name: impl Into<String>, captain: impl Into<String>) -> Self {
        let captain = captain.into();
        Self {
            name: name.into(),
            members: vec![captain.clone()],
            captain,
        }
    }
}

impl<S: DocumentStore> Collection<Team, S> {
    pub fn create_team(&self, team: &NewTeam) -> Result<Team, StoreError> {
        require("name", &team.name)?;
        require("captain", &team.captain)?;
        self.insert(team)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<Team>, StoreError> {
        self.find_one(|team| team.name == name)
    }

    /// Add `username` to the roster. Adding an existing member changes nothing.
    pub fn add_member(&self, id: EntityId, username: &str) -> Result<Team, StoreError> {
        require("username", username)?;
        self.update_with(id, |team| {
            if !team.has_member(username) {
                team.members.push(username.to_string());
            }
            Ok(())
        })
    }

    /// Remove `username` from the roster. The captain cannot be removed.
    pub fn remove_member(&self, id: EntityId, username: &str) -> Result<Team, StoreError> {
        self.update_with(id, |team| {
            if team.captain == username {
                return Err(Rejection::InvalidField {
                    field: "members",
                    reason: format!("{} is the captain of {}", username, team.name),
                }
                .into());
            }
            team.members.retain(|member| member != username);
            Ok(())
        })
    }
}
