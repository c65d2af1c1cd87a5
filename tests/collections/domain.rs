//! Per-entity helpers built on the generic collection.

use chrono::{Duration, Utc};
use commons_store::{
    Announcement, Application, ApplicationStatus, InMemoryDocumentStore, NewAnnouncement,
    NewApplication, NewTeam, NewUser, Rejection, Store, StoreError, Team, User, UserStatus,
};
use serde_json::json;

fn store() -> Store<InMemoryDocumentStore> {
    Store::new(InMemoryDocumentStore::new())
}

#[test]
fn team_roster_changes() {
    let teams = store().collection::<Team>();
    let team = teams.create_team(&NewTeam::new("Owls", "alice")).unwrap();
    assert_eq!(team.members, vec!["alice".to_string()]);

    teams.add_member(team.id, "bob").unwrap();
    let team = teams.add_member(team.id, "bob").unwrap();
    assert_eq!(team.members, vec!["alice".to_string(), "bob".to_string()]);

    let team = teams.remove_member(team.id, "bob").unwrap();
    assert!(!team.has_member("bob"));

    let err = teams.remove_member(team.id, "alice").unwrap_err();
    assert!(matches!(
        err.rejection(),
        Some(Rejection::InvalidField { field: "members", .. })
    ));
    assert!(teams.find_by_name("Owls").unwrap().unwrap().has_member("alice"));
}

#[test]
fn team_needs_a_name() {
    let teams = store().collection::<Team>();
    let err = teams.create_team(&NewTeam::new(" ", "alice")).unwrap_err();
    assert_eq!(err, StoreError::ValidationRejected(Rejection::MissingField("name")));
}

#[test]
fn roster_change_on_missing_team_is_not_found() {
    let teams = store().collection::<Team>();
    let err = teams.add_member(3, "bob").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 3, .. }));
}

#[test]
fn applications_are_decided_once() {
    let applications = store().collection::<Application>();
    let application = applications
        .submit(&NewApplication::new("carol", "Owls", "I can fly"))
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(applications.pending_for_team("Owls").unwrap().len(), 1);

    let decided = applications
        .decide(application.id, ApplicationStatus::Accepted)
        .unwrap();
    assert_eq!(decided.status, ApplicationStatus::Accepted);
    assert!(applications.pending_for_team("Owls").unwrap().is_empty());

    let err = applications
        .decide(application.id, ApplicationStatus::Rejected)
        .unwrap_err();
    assert!(matches!(
        err.rejection(),
        Some(Rejection::InvalidField { field: "status", .. })
    ));
    assert_eq!(
        applications.get(application.id).unwrap().unwrap().status,
        ApplicationStatus::Accepted
    );
}

#[test]
fn deciding_pending_is_refused() {
    let applications = store().collection::<Application>();
    let application = applications
        .submit(&NewApplication::new("carol", "Owls", ""))
        .unwrap();
    assert!(applications
        .decide(application.id, ApplicationStatus::Pending)
        .is_err());
}

#[test]
fn feed_puts_pinned_first_then_newest() {
    let announcements = store().collection::<Announcement>();
    let old = announcements
        .post(&NewAnnouncement::new("Welcome", "Hello", "staff"))
        .unwrap();
    let pinned = announcements
        .post(&NewAnnouncement::new("Rules", "Be kind", "staff").pinned())
        .unwrap();
    let newest = announcements
        .post(&NewAnnouncement::new("Event", "Friday", "staff"))
        .unwrap();

    // Age the first post so ordering does not depend on clock resolution.
    announcements
        .update_by_id(
            old.id,
            &json!({ "created_at": Utc::now() - Duration::days(1) }),
        )
        .unwrap();

    let ids: Vec<u64> = announcements
        .feed()
        .unwrap()
        .into_iter()
        .map(|announcement| announcement.id)
        .collect();
    assert_eq!(ids, vec![pinned.id, newest.id, old.id]);
}

#[test]
fn user_status_changes() {
    let users = store().collection::<User>();
    let user = users
        .insert(&NewUser {
            username: "dave".into(),
            email: "d@x.com".into(),
            discord_id: "dave#4".into(),
            role: "member".into(),
            status: UserStatus::Active,
            password: "pw".into(),
        })
        .unwrap();

    let user = users.set_status(user.id, UserStatus::Suspended).unwrap();
    assert_eq!(user.status, UserStatus::Suspended);
    assert_eq!(
        users.find_by_username("dave").unwrap().unwrap().status,
        UserStatus::Suspended
    );
    assert!(users.find_by_username("Dave").unwrap().is_none());
}
