//! Invite redemption and signup.
//!
//! An invite code moves `Active -> Exhausted | Expired`; both end states refuse
//! further redemptions. Signing up with a code consumes one use and grants the
//! code's role to the new user.
//!
//! ## Example
//!
//! ```ignore
//! use commons_store::{RedemptionService, SignupRequest, Store, StoreConfig};
//!
//! let service = RedemptionService::new(Store::open(&StoreConfig::from_env()));
//! let user = service.signup(
//!     &SignupRequest::new("alice", "a@x.com", "pw", "alice#1").invite_code("ABC123"),
//! )?;
//! ```

#[cfg(feature = "emitter")]
mod events;
mod service;
mod signup;

#[cfg(feature = "emitter")]
pub use events::{InviteRedeemed, SignupEvents, UserSignedUp, INVITE_REDEEMED, USER_SIGNED_UP};
pub use service::RedemptionService;
pub use signup::SignupRequest;
