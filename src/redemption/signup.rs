use serde::{Deserialize, Serialize};

use crate::entities::{require, User};
use crate::error::Rejection;

/// A signup as submitted by the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub discord_id: String,
    /// Requested role; overridden by the invite code's role.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub invite_code: Option<String>,
}

impl SignupRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        discord_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            discord_id: discord_id.into(),
            role: None,
            invite_code: None,
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn invite_code(mut self, code: impl Into<String>) -> Self {
        self.invite_code = Some(code.into());
        self
    }

    /// Required fields must be present and non-blank.
    pub fn validate(&self) -> Result<(), Rejection> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("discord_id", &self.discord_id)?;
        Ok(())
    }

    /// A blank invite code counts as no invite code.
    pub(crate) fn invite(&self) -> Option<&str> {
        self.invite_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }

    /// The first existing user sharing a unique field with this request.
    pub(crate) fn conflict_with(&self, users: &[User]) -> Option<Rejection> {
        users.iter().find_map(|user| {
            if user.username == self.username {
                Some(Rejection::DuplicateUsername(self.username.clone()))
            } else if user.email == self.email {
                Some(Rejection::DuplicateEmail(self.email.clone()))
            } else if user.discord_id == self.discord_id {
                Some(Rejection::DuplicateDiscordId(self.discord_id.clone()))
            } else {
                None
            }
        })
    }
}
