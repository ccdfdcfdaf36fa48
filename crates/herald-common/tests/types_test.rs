//! Tests for the shared newtypes.

use herald_common::{PermissionLevel, RecipientId, SquadId, TeamId};
use std::collections::HashSet;

#[test]
fn test_recipient_id_display_and_conversion() {
    let id = RecipientId::from(76_561_198_000_000_001);
    assert_eq!(id.to_string(), "76561198000000001");
    assert_eq!(id, RecipientId(76_561_198_000_000_001));
}

#[test]
fn test_recipient_id_serializes_transparently() {
    let json = serde_json::to_string(&RecipientId(42)).unwrap();
    assert_eq!(json, "42");

    let parsed: RecipientId = serde_json::from_str("7").unwrap();
    assert_eq!(parsed, RecipientId(7));
}

#[test]
fn test_recipient_ids_are_hashable() {
    let ids: HashSet<RecipientId> = [RecipientId(1), RecipientId(2), RecipientId(1)]
        .into_iter()
        .collect();
    assert_eq!(ids.len(), 2);
}

#[test]
fn test_team_and_squad_display() {
    assert_eq!(TeamId(1).to_string(), "1");
    assert_eq!(SquadId(3).to_string(), "3");
}

#[test]
fn test_permission_level_ordering() {
    assert!(PermissionLevel::Admin > PermissionLevel::Moderator);
    assert!(PermissionLevel::Moderator > PermissionLevel::Helper);
    assert!(PermissionLevel::Helper > PermissionLevel::Member);
    assert_eq!(PermissionLevel::default(), PermissionLevel::Member);
}

#[test]
fn test_permission_level_serde_names() {
    let json = serde_json::to_string(&PermissionLevel::Moderator).unwrap();
    assert_eq!(json, "\"moderator\"");
    assert_eq!(PermissionLevel::Admin.to_string(), "admin");
}
