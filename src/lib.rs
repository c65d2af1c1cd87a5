//! Whole-file JSON collections for a community platform.
//!
//! Users, teams, applications, announcements and invite codes each live in one
//! JSON file. `Collection<T>` gives typed list / insert / update / delete over
//! a file, serialized per collection by a lock; `RedemptionService` consumes
//! invite codes during signup.

// Lets the `Document` derive refer to `::commons_store` from inside this crate.
extern crate self as commons_store;

mod collection;
mod config;
mod document;
mod entities;
mod error;
#[cfg(feature = "http")]
mod http;
mod lock;
mod redemption;
mod store;

pub use collection::Collection;
pub use config::{StoreConfig, StoreOptions, DATA_DIR_ENV, LOCK_ENV};
pub use document::{
    Document, DocumentStore, EntityId, FileDocumentStore, InMemoryDocumentStore, LoadOrigin,
    RawDocument, Snapshot,
};
pub use entities::{
    Announcement, Application, ApplicationStatus, InviteCode, InviteState, NewAnnouncement,
    NewApplication, NewInvite, NewTeam, NewUser, Team, User, UserStatus, DEFAULT_ROLE,
    INVITE_CODE_LEN,
};
pub use error::{InviteRejection, Rejection, StoreError};
#[cfg(feature = "http")]
pub use http::ErrorResponse;
pub use lock::{CollectionGuard, CollectionLocks, LockError};
pub use redemption::{RedemptionService, SignupRequest};
pub use store::Store;
#[cfg(feature = "emitter")]
pub use redemption::{InviteRedeemed, SignupEvents, UserSignedUp, INVITE_REDEEMED, USER_SIGNED_UP};

// Derive macro for `Document`
pub use commons_store_macros::Document;
