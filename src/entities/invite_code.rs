use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::require;
use crate::collection::Collection;
use crate::document::{DocumentStore, EntityId};
use crate::error::{InviteRejection, Rejection, StoreError};
use crate::Document;

/// Length of generated invite codes.
pub const INVITE_CODE_LEN: usize = 8;

const CODE_ALPHABET: [char; 36] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Redemption state of an invite code.
///
/// `Exhausted` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteState {
    Active,
    Exhausted,
    Expired,
}

/// A code granting `role` to whoever signs up with it, up to `max_uses` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "invite_codes", key = "invite_codes")]
pub struct InviteCode {
    pub id: EntityId,
    pub code: String,
    pub role: String,
    pub max_uses: i64,
    pub uses_left: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used_by: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InviteCode {
    /// Exhaustion is checked before expiry.
    pub fn state(&self, now: DateTime<Utc>) -> InviteState {
        if self.uses_left <= 0 {
            InviteState::Exhausted
        } else if self.expires_at.is_some_and(|expires_at| now > expires_at) {
            InviteState::Expired
        } else {
            InviteState::Active
        }
    }

    /// Consume one use on behalf of `username`.
    pub fn redeem_by(&mut self, username: &str, now: DateTime<Utc>) -> Result<(), InviteRejection> {
        match self.state(now) {
            InviteState::Exhausted => Err(InviteRejection::Exhausted(self.code.clone())),
            InviteState::Expired => Err(InviteRejection::Expired(self.code.clone())),
            InviteState::Active => {
                self.uses_left -= 1;
                self.used_by.push(username.to_string());
                Ok(())
            }
        }
    }
}

/// Parameters for issuing an invite code.
#[derive(Debug, Clone)]
pub struct NewInvite {
    /// Explicit code; generated when `None`.
    pub code: Option<String>,
    pub role: String,
    pub max_uses: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewInvite {
    pub fn new(role: impl Into<String>, max_uses: i64) -> Self {
        Self {
            code: None,
            role: role.into(),
            max_uses,
            expires_at: None,
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

#[derive(Serialize)]
struct InviteFields<'a> {
    code: &'a str,
    role: &'a str,
    max_uses: i64,
    uses_left: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    used_by: Vec<String>,
}

fn generate_code() -> String {
    nanoid!(INVITE_CODE_LEN, &CODE_ALPHABET)
}

impl<S: DocumentStore> Collection<InviteCode, S> {
    /// Create an `Active` code with `uses_left = max_uses` and no redemptions.
    pub fn issue(&self, invite: &NewInvite) -> Result<InviteCode, StoreError> {
        require("role", &invite.role)?;
        if invite.max_uses < 1 {
            return Err(Rejection::InvalidField {
                field: "max_uses",
                reason: format!("must be at least 1, got {}", invite.max_uses),
            }
            .into());
        }

        let _guard = self.guard()?;
        let existing = self.list()?;
        let code = match &invite.code {
            Some(code) => {
                require("code", code)?;
                if existing.iter().any(|other| other.code == *code) {
                    return Err(Rejection::DuplicateInviteCode(code.clone()).into());
                }
                code.clone()
            }
            None => loop {
                let candidate = generate_code();
                if !existing.iter().any(|other| other.code == candidate) {
                    break candidate;
                }
            },
        };

        let issued = self.insert_held(&InviteFields {
            code: &code,
            role: &invite.role,
            max_uses: invite.max_uses,
            uses_left: invite.max_uses,
            expires_at: invite.expires_at,
            used_by: Vec::new(),
        })?;
        info!(code = %issued.code, role = %issued.role, max_uses = issued.max_uses, "issued invite code");
        Ok(issued)
    }

    /// Exact, case-sensitive lookup.
    pub fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, StoreError> {
        self.find_one(|invite| invite.code == code)
    }

    /// Consume one use of `code`. The caller must hold this collection's guard.
    pub(crate) fn redeem_held(
        &self,
        code: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<InviteCode, StoreError> {
        let mut loaded = self.load()?;
        let (index, mut invite) = loaded
            .position(|invite| invite.code == code)
            .ok_or_else(|| InviteRejection::NotFound(code.to_string()))?;

        invite.redeem_by(username, now)?;
        let invite = loaded.replace(index, &invite, now)?;
        self.commit(loaded)?;
        Ok(invite)
    }
}
