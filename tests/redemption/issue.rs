//! Issuing invite codes.

use chrono::Utc;
use commons_store::{InviteCode, InviteState, NewInvite, Rejection, INVITE_CODE_LEN};

use crate::support::service;

#[test]
fn issued_code_starts_active_with_every_use_left() {
    let invites = service().store().collection::<InviteCode>();
    let invite = invites.issue(&NewInvite::new("staff", 3)).unwrap();

    assert_eq!(invite.code.len(), INVITE_CODE_LEN);
    assert!(invite
        .code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert_eq!(invite.max_uses, 3);
    assert_eq!(invite.uses_left, 3);
    assert!(invite.used_by.is_empty());
    assert_eq!(invite.state(Utc::now()), InviteState::Active);
}

#[test]
fn generated_codes_are_distinct() {
    let invites = service().store().collection::<InviteCode>();
    let first = invites.issue(&NewInvite::new("member", 1)).unwrap();
    let second = invites.issue(&NewInvite::new("member", 1)).unwrap();
    assert_ne!(first.code, second.code);
    assert_eq!(second.id, 2);
}

#[test]
fn duplicate_explicit_code_is_rejected() {
    let invites = service().store().collection::<InviteCode>();
    invites.issue(&NewInvite::new("staff", 1).code("ABC123")).unwrap();

    let err = invites
        .issue(&NewInvite::new("member", 1).code("ABC123"))
        .unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&Rejection::DuplicateInviteCode("ABC123".into()))
    );
    assert_eq!(invites.count().unwrap(), 1);
}

#[test]
fn zero_uses_is_rejected() {
    let invites = service().store().collection::<InviteCode>();
    let err = invites.issue(&NewInvite::new("staff", 0)).unwrap_err();
    assert!(matches!(
        err.rejection(),
        Some(Rejection::InvalidField { field: "max_uses", .. })
    ));
}
