#![forbid(unsafe_code)]
use boutique::io;
use boutique::model::StaffMember;
use boutique::staff::{CheckinAction, CheckinBoard, StaffError};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::tempdir;

fn sample_board() -> CheckinBoard {
    let mut board = CheckinBoard::new();
    let mut alice = StaffMember::new("alice", "Alice");
    alice.role = Some("Caisse".to_string());
    let bob = StaffMember::new("bob", "Bob");
    board.add_members(vec![alice, bob]);
    board
}

#[test]
fn checkin_and_checkout_flow() {
    let mut board = sample_board();
    let t0 = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();

    board.check_in("alice", t0).unwrap();
    assert_eq!(board.active().len(), 1);

    board.check_out("alice", t1).unwrap();
    assert!(board.active().is_empty());

    let record = &board.log().checkins[0];
    assert!(!record.active);
    assert_eq!(record.checked_out_at, Some(t1));
}

#[test]
fn double_checkin_is_refused() {
    let mut board = sample_board();
    let t0 = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();

    board.check_in("alice", t0).unwrap();
    let err = board.check_in("alice", t0).unwrap_err();
    assert!(matches!(err, StaffError::AlreadyActive(_)));
}

#[test]
fn checkout_without_checkin_is_refused() {
    let mut board = sample_board();
    let t0 = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();

    let err = board.check_out("bob", t0).unwrap_err();
    assert!(matches!(err, StaffError::NotActive(_)));

    let err = board.check_in("charlie", t0).unwrap_err();
    assert!(matches!(err, StaffError::UnknownHandle(_)));
}

#[test]
fn summary_embed_groups_by_role() {
    let mut board = sample_board();
    let t0 = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
    board.check_in("alice", t0).unwrap();
    board.check_in("bob", t0).unwrap();

    let embed = board.summary_embed("Alice", CheckinAction::In, t0, 0);
    assert!(embed.title.contains("Alice"));
    assert!(embed.title.contains("a pris son service"));

    let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"📋 Caisse"));
    assert!(names.contains(&"📋 Membres"));

    // heure murale de prise de service dans la ligne du membre
    let caisse = embed
        .fields
        .iter()
        .find(|f| f.name == "📋 Caisse")
        .unwrap();
    assert!(caisse.value.contains("Alice (09:00)"));
}

#[test]
fn summary_embed_with_nobody_active() {
    let board = sample_board();
    let t0 = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();

    let embed = board.summary_embed("Alice", CheckinAction::Out, t0, 0);
    assert!(embed.title.contains("a quitté son service"));
    assert!(embed
        .fields
        .iter()
        .any(|f| f.value.contains("Personne en service")));
}

#[test]
fn import_staff_csv_reads_roles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("staff.csv");
    fs::write(
        &path,
        "handle,display_name,role\nalice,Alice,Caisse\nbob,Bob,\n",
    )
    .unwrap();

    let members = io::import_staff_csv(&path).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].role.as_deref(), Some("Caisse"));
    assert_eq!(members[1].role, None);
}

#[test]
fn import_staff_csv_rejects_empty_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("staff.csv");
    fs::write(&path, "handle,display_name\n,Alice\n").unwrap();

    assert!(io::import_staff_csv(&path).is_err());
}

#[test]
fn export_checkins_csv_writes_log() {
    let dir = tempdir().unwrap();
    let mut board = sample_board();
    let t0 = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
    board.check_in("alice", t0).unwrap();

    let out = dir.path().join("checkins.csv");
    io::export_checkins_csv(&out, board.log()).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("handle,display_name,checked_in_at"));
    assert!(content.contains("alice,Alice,"));
    assert!(content.contains("true"));
}
