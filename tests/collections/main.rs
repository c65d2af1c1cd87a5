//! Collection repository tests.
//!
//! Covers id assignment, shallow-merge updates, deletes, degraded loads of
//! missing or corrupt files, and the per-entity helpers.

mod domain;

use chrono::Utc;
use commons_store::{
    Collection, Document, InMemoryDocumentStore, InviteCode, NewInvite, NewTeam, Store,
    StoreError, Team,
};
use serde_json::json;

fn teams() -> Collection<Team, InMemoryDocumentStore> {
    Store::new(InMemoryDocumentStore::new()).collection::<Team>()
}

// ============================================================================
// Id assignment
// ============================================================================

#[test]
fn serialized_inserts_get_unique_increasing_ids() {
    let teams = teams();
    let ids: Vec<u64> = ["Owls", "Foxes", "Hares", "Crows", "Moles"]
        .iter()
        .map(|name| teams.insert(&NewTeam::new(*name, "alice")).unwrap().id)
        .collect();

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn insert_ignores_caller_id_and_created_at() {
    let teams = teams();
    let team = teams
        .insert(&json!({
            "id": 99,
            "created_at": "1999-01-01T00:00:00Z",
            "name": "Owls",
            "captain": "alice",
            "members": ["alice"],
        }))
        .unwrap();

    assert_eq!(team.id, 1);
    assert!(team.created_at > Utc::now() - chrono::Duration::minutes(1));
    assert_eq!(team.updated_at, None);
}

#[test]
fn next_id_follows_the_largest_remaining_id() {
    let teams = teams();
    for name in ["a", "b", "c"] {
        teams.insert(&NewTeam::new(name, "alice")).unwrap();
    }

    assert!(teams.delete_by_id(2).unwrap());
    assert_eq!(teams.insert(&NewTeam::new("d", "alice")).unwrap().id, 4);

    assert!(teams.delete_by_id(4).unwrap());
    assert_eq!(teams.insert(&NewTeam::new("e", "alice")).unwrap().id, 4);
}

#[test]
fn insert_missing_required_fields_is_a_serde_error_and_writes_nothing() {
    let teams = teams();
    let err = teams.insert(&json!({ "name": "Owls" })).unwrap_err();

    assert!(matches!(err, StoreError::Serde(_)));
    assert_eq!(teams.count().unwrap(), 0);
}

#[test]
fn insert_after_the_largest_possible_id_is_refused() {
    let documents = InMemoryDocumentStore::new();
    documents
        .put_raw(
            "invite_codes",
            json!({ "invite_codes": [{ "id": u64::MAX }] }).to_string(),
        )
        .unwrap();
    let invites = Store::new(documents.clone()).collection::<InviteCode>();

    let err = invites.issue(&NewInvite::new("staff", 1)).unwrap_err();
    assert!(matches!(err, StoreError::Serde(_)));
    let raw: serde_json::Value =
        serde_json::from_slice(&documents.raw("invite_codes").unwrap().unwrap()).unwrap();
    assert_eq!(raw["invite_codes"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn update_merges_fields_and_stamps_updated_at() {
    let teams = teams();
    let team = teams.insert(&NewTeam::new("Owls", "alice")).unwrap();

    let updated = teams
        .update_by_id(team.id, &json!({ "name": "Night Owls", "id": 42 }))
        .unwrap();

    assert_eq!(updated.id, team.id);
    assert_eq!(updated.name, "Night Owls");
    assert_eq!(updated.captain, "alice");
    assert_eq!(updated.members, vec!["alice".to_string()]);
    assert_eq!(updated.created_at, team.created_at);
    assert!(updated.updated_at.is_some());

    assert_eq!(teams.get(team.id).unwrap(), Some(updated));
}

#[test]
fn update_with_empty_patch_is_idempotent() {
    let teams = teams();
    let team = teams.insert(&NewTeam::new("Owls", "alice")).unwrap();

    let first = teams.update_by_id(team.id, &json!({})).unwrap();
    let second = teams.update_by_id(team.id, &json!({})).unwrap();

    let strip = |mut team: Team| {
        team.updated_at = None;
        team
    };
    assert_eq!(strip(first), strip(second.clone()));
    assert_eq!(strip(second), team);
}

#[test]
fn update_unknown_id_is_not_found() {
    let teams = teams();
    teams.insert(&NewTeam::new("Owls", "alice")).unwrap();

    let err = teams.update_by_id(7, &json!({ "name": "x" })).unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            collection: "teams".into(),
            id: 7
        }
    );
}

#[test]
fn update_that_breaks_the_entity_type_is_refused() {
    let teams = teams();
    let team = teams.insert(&NewTeam::new("Owls", "alice")).unwrap();

    let err = teams
        .update_by_id(team.id, &json!({ "members": "everyone" }))
        .unwrap_err();

    assert!(matches!(err, StoreError::Serde(_)));
    assert_eq!(teams.get(team.id).unwrap(), Some(team));
}

#[test]
fn typed_update_can_clear_an_optional_field() {
    let invites = Store::new(InMemoryDocumentStore::new()).collection::<InviteCode>();
    let invite = invites
        .issue(&NewInvite::new("staff", 2).expires_at(Utc::now() + chrono::Duration::hours(1)))
        .unwrap();
    assert!(invite.expires_at.is_some());

    let returned = invites
        .update_with(invite.id, |invite| {
            invite.expires_at = None;
            Ok(())
        })
        .unwrap();

    assert_eq!(returned.expires_at, None);
    assert_eq!(invites.get(invite.id).unwrap().unwrap().expires_at, None);
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn second_delete_of_the_same_id_returns_false() {
    let teams = teams();
    let team = teams.insert(&NewTeam::new("Owls", "alice")).unwrap();

    assert!(teams.delete_by_id(team.id).unwrap());
    assert!(!teams.delete_by_id(team.id).unwrap());
    assert!(teams.list().unwrap().is_empty());
}

#[test]
fn delete_on_an_empty_collection_writes_nothing() {
    let documents = InMemoryDocumentStore::new();
    let teams = Store::new(documents.clone()).collection::<Team>();

    assert!(!teams.delete_by_id(1).unwrap());
    assert!(documents.raw(Team::COLLECTION).unwrap().is_none());
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn writing_while_holding_the_guard_is_refused() {
    let teams = teams();
    let team = teams.insert(&NewTeam::new("Owls", "alice")).unwrap();

    let guard = teams.guard().unwrap();
    let err = teams.insert(&NewTeam::new("Foxes", "bob")).unwrap_err();
    assert_eq!(
        err,
        StoreError::AlreadyLocked {
            collection: "teams".into()
        }
    );
    assert!(teams.delete_by_id(team.id).is_err());
    assert_eq!(teams.count().unwrap(), 1);

    drop(guard);
    assert_eq!(teams.insert(&NewTeam::new("Foxes", "bob")).unwrap().id, 2);
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn find_and_find_one_scan_linearly() {
    let teams = teams();
    teams.insert(&NewTeam::new("Owls", "alice")).unwrap();
    teams.insert(&NewTeam::new("Foxes", "bob")).unwrap();
    teams.insert(&NewTeam::new("Hares", "alice")).unwrap();

    let alices: Vec<String> = teams
        .find(|team| team.captain == "alice")
        .unwrap()
        .into_iter()
        .map(|team| team.name)
        .collect();
    assert_eq!(alices, vec!["Owls".to_string(), "Hares".to_string()]);

    let foxes = teams.find_one(|team| team.name == "Foxes").unwrap().unwrap();
    assert_eq!(foxes.id, 2);
    assert!(teams.find_one(|team| team.name == "Moles").unwrap().is_none());
    assert_eq!(teams.count().unwrap(), 3);
}
