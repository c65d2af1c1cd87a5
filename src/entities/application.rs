use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use crate::collection::Collection;
use crate::document::{DocumentStore, EntityId};
use crate::error::{Rejection, StoreError};
use crate::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A recruitment application from a user to a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "applications", key = "applications")]
pub struct Application {
    pub id: EntityId,
    pub username: String,
    pub team: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewApplication {
    pub username: String,
    pub team: String,
    pub message: String,
    pub status: ApplicationStatus,
}

impl NewApplication {
    pub fn new(
        username: impl Into<String>,
        team: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            team: team.into(),
            message: message.into(),
            status: ApplicationStatus::Pending,
        }
    }
}

impl<S: DocumentStore> Collection<Application, S> {
    pub fn submit(&self, application: &NewApplication) -> Result<Application, StoreError> {
        require("username", &application.username)?;
        require("team", &application.team)?;
        self.insert(application)
    }

    /// Move a pending application to `Accepted` or `Rejected`.
    pub fn decide(
        &self,
        id: EntityId,
        decision: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        if decision == ApplicationStatus::Pending {
            return Err(Rejection::InvalidField {
                field: "status",
                reason: "a decision must accept or reject".into(),
            }
            .into());
        }
        self.update_with(id, |application| {
            if application.status != ApplicationStatus::Pending {
                return Err(Rejection::InvalidField {
                    field: "status",
                    reason: format!("application {} was already decided", application.id),
                }
                .into());
            }
            application.status = decision;
            Ok(())
        })
    }

    pub fn pending_for_team(&self, team: &str) -> Result<Vec<Application>, StoreError> {
        self.find(|application| {
            application.team == team && application.status == ApplicationStatus::Pending
        })
    }
}
