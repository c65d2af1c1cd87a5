use chrono::Utc;
use tracing::{error, info, warn};

#[cfg(feature = "emitter")]
use std::sync::Arc;

use super::signup::SignupRequest;
use crate::document::{Document, DocumentStore};
use crate::entities::{require, InviteCode, NewUser, User, UserStatus, DEFAULT_ROLE};
use crate::error::StoreError;
use crate::store::Store;

#[cfg(feature = "emitter")]
use super::events::SignupEvents;

/// Invite redemption and user signup across the invite-code and user collections.
///
/// The two collections are separate files, so a signup with an invite code is
/// two writes with no rollback: the code's use is persisted first, then the
/// user. If the second write fails the use stays consumed.
pub struct RedemptionService<S> {
    store: Store<S>,
    #[cfg(feature = "emitter")]
    events: Option<Arc<SignupEvents>>,
}

impl<S: DocumentStore> RedemptionService<S> {
    pub fn new(store: Store<S>) -> Self {
        Self {
            store,
            #[cfg(feature = "emitter")]
            events: None,
        }
    }

    /// Emit `InviteRedeemed` / `UserSignedUp` to `events` after each write.
    #[cfg(feature = "emitter")]
    pub fn with_events(mut self, events: Arc<SignupEvents>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Consume one use of `code` for `username`.
    ///
    /// Rejects unknown codes (exact, case-sensitive match), codes with no uses
    /// left, and codes past their expiry.
    pub fn redeem(&self, code: &str, username: &str) -> Result<InviteCode, StoreError> {
        require("code", code)?;
        require("username", username)?;

        let invites = self.store.collection::<InviteCode>();
        let _guard = invites.guard()?;
        let invite = self.redeem_held(code, username)?;
        Ok(invite)
    }

    /// Create an active user, redeeming `request.invite_code` first if present.
    ///
    /// The invite code's role overrides any requested role.
    pub fn signup(&self, request: &SignupRequest) -> Result<User, StoreError> {
        request.validate()?;

        let users = self.store.collection::<User>();
        let _guard = self
            .store
            .guard(&[User::COLLECTION, InviteCode::COLLECTION])?;

        if let Some(conflict) = request.conflict_with(&users.list()?) {
            info!(username = %request.username, reason = %conflict, "signup rejected");
            return Err(conflict.into());
        }

        let mut role = request
            .role
            .clone()
            .filter(|role| !role.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let redeemed = match request.invite() {
            Some(code) => {
                let invite = self.redeem_held(code, &request.username)?;
                role = invite.role.clone();
                Some(invite)
            }
            None => None,
        };

        let new_user = NewUser {
            username: request.username.clone(),
            email: request.email.clone(),
            discord_id: request.discord_id.clone(),
            role,
            status: UserStatus::Active,
            password: request.password.clone(),
        };

        let user = match users.insert_held(&new_user) {
            Ok(user) => user,
            Err(err) => {
                if let Some(invite) = &redeemed {
                    error!(
                        code = %invite.code,
                        username = %request.username,
                        %err,
                        "invite code consumed but user was not created"
                    );
                }
                return Err(err);
            }
        };

        info!(id = user.id, username = %user.username, role = %user.role, "user signed up");

        #[cfg(feature = "emitter")]
        if let Some(events) = &self.events {
            events.user_signed_up(&user, redeemed.as_ref().map(|invite| invite.code.as_str()));
        }

        Ok(user)
    }

    /// Redeem with the invite-code guard already held.
    fn redeem_held(&self, code: &str, username: &str) -> Result<InviteCode, StoreError> {
        let invites = self.store.collection::<InviteCode>();
        let invite = match invites.redeem_held(code, username, Utc::now()) {
            Ok(invite) => invite,
            Err(err) => {
                warn!(code, username, %err, "invite redemption refused");
                return Err(err);
            }
        };

        info!(code, username, uses_left = invite.uses_left, "invite code redeemed");

        #[cfg(feature = "emitter")]
        if let Some(events) = &self.events {
            events.invite_redeemed(&invite, username);
        }

        Ok(invite)
    }
}
