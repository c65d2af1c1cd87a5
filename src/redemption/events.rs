//! Post-persistence notifications for signups and invite redemptions.

use std::sync::Mutex;

use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::EntityId;
use crate::entities::{InviteCode, User};

pub const USER_SIGNED_UP: &str = "UserSignedUp";
pub const INVITE_REDEEMED: &str = "InviteRedeemed";

/// Emitted after a new user record is written. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSignedUp {
    pub id: EntityId,
    pub username: String,
    pub role: String,
    pub invite_code: Option<String>,
}

/// Emitted after an invite code's consumed use is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRedeemed {
    pub code: String,
    pub username: String,
    pub role: String,
    pub uses_left: i64,
}

/// Listener registry for redemption events.
///
/// Listeners run on the emitter's own threads, after the write has succeeded.
pub struct SignupEvents {
    emitter: Mutex<EventEmitter>,
}

impl Default for SignupEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupEvents {
    pub fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    pub fn on_user_signed_up<F>(&self, listener: F)
    where
        F: Fn(UserSignedUp) + Send + Sync + 'static,
    {
        self.on(USER_SIGNED_UP, listener);
    }

    pub fn on_invite_redeemed<F>(&self, listener: F)
    where
        F: Fn(InviteRedeemed) + Send + Sync + 'static,
    {
        self.on(INVITE_REDEEMED, listener);
    }

    fn on<T, F>(&self, event: &str, listener: F)
    where
        T: for<'de> Deserialize<'de>,
        F: Fn(T) + Send + Sync + 'static,
    {
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.on(event, listener);
            }
            Err(_) => warn!(event, "emitter poisoned, listener not registered"),
        }
    }

    pub(crate) fn user_signed_up(&self, user: &User, invite_code: Option<&str>) {
        self.emit(
            USER_SIGNED_UP,
            UserSignedUp {
                id: user.id,
                username: user.username.clone(),
                role: user.role.clone(),
                invite_code: invite_code.map(str::to_string),
            },
        );
    }

    pub(crate) fn invite_redeemed(&self, invite: &InviteCode, username: &str) {
        self.emit(
            INVITE_REDEEMED,
            InviteRedeemed {
                code: invite.code.clone(),
                username: username.to_string(),
                role: invite.role.clone(),
                uses_left: invite.uses_left,
            },
        );
    }

    fn emit<T: Serialize>(&self, event: &str, payload: T) {
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.emit(event, payload);
            }
            Err(_) => warn!(event, "emitter poisoned, event dropped"),
        }
    }
}
