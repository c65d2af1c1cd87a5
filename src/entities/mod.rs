//! Entity types of the community platform and their collection bindings.
//!
//! | Entity        | File                 | Array key       |
//! |---------------|----------------------|-----------------|
//! | User          | `users.json`         | `users`         |
//! | Team          | `teams.json`         | `teams`         |
//! | Application   | `applications.json`  | `applications`  |
//! | Announcement  | `announcements.json` | `announcements` |
//! | InviteCode    | `invite_codes.json`  | `invite_codes`  |

mod announcement;
mod application;
mod invite_code;
mod team;
mod user;

pub use announcement::{Announcement, NewAnnouncement};
pub use application::{Application, ApplicationStatus, NewApplication};
pub use invite_code::{InviteCode, InviteState, NewInvite, INVITE_CODE_LEN};
pub use team::{NewTeam, Team};
pub use user::{NewUser, User, UserStatus, DEFAULT_ROLE};

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), crate::Rejection> {
    if value.trim().is_empty() {
        Err(crate::Rejection::MissingField(field))
    } else {
        Ok(())
    }
}
