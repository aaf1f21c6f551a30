#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("boutique-cli").unwrap();
    cmd.env_remove("BOUTIQUE_WEBHOOK_URL")
        .arg("--settings")
        .arg(dir.join("settings.json"))
        .arg("--data")
        .arg(dir);
    cmd
}

#[test]
fn vacation_then_status_reports_closed() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .args(["vacation", "--mode", "on", "--message", "Retour en septembre"])
        .assert()
        .success();

    cli(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("fermé (vacances)"));
}

#[test]
fn show_lists_effective_settings() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("morning_shift_start = 08:00"))
        .stdout(predicate::str::contains("evening_shift_end = 22:00"));
}

#[test]
fn set_shift_rejects_invalid_time() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .args(["set-shift", "--shift", "morning", "--start", "25:99"])
        .assert()
        .failure();

    cli(dir.path())
        .args(["set-shift", "--shift", "night", "--start", "08:00"])
        .assert()
        .failure();
}

#[test]
fn tick_is_skipped_during_vacation() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .args(["vacation", "--mode", "on"])
        .assert()
        .success();

    cli(dir.path())
        .arg("tick")
        .assert()
        .success()
        .stdout(predicate::str::contains("ignoré (mode vacances)"));
}

#[test]
fn apply_then_list_pending() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .args([
            "apply",
            "--account",
            "walker01",
            "--character",
            "John Walker",
            "--discord",
            "walker#01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("candidature déposée"));

    cli(dir.path())
        .arg("applications")
        .assert()
        .success()
        .stdout(predicate::str::contains("walker#01"));
}

#[test]
fn announce_without_webhook_still_stores() {
    let dir = tempdir().unwrap();

    cli(dir.path())
        .args([
            "announce",
            "--title",
            "Réouverture",
            "--content",
            "On revient lundi",
            "--kind",
            "success",
            "--by",
            "admin@boutique",
        ])
        .assert()
        .success();

    cli(dir.path())
        .arg("announcements")
        .assert()
        .success()
        .stdout(predicate::str::contains("Réouverture"));
}
