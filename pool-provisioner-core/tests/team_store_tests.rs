#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `TeamStore` — dual-shape normalization and
//! write-back of discovered data.

use pool_provisioner_core::services::TeamStore;
use pool_provisioner_core::types::TeamFormat;

fn write_team_file(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("team.json");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn loads_mixed_formats() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_team_file(
        &tmp,
        r#"[
            {"user":{"email":"a@b.com"},"account":{"id":"1","organizationId":"o1"},"accessToken":"tok"},
            {"account":"x@y.com","password":"pw","token":"t1","authorized":true}
        ]"#,
    );

    let store = TeamStore::load(&path).unwrap();
    assert_eq!(store.teams().len(), 2);

    let legacy = &store.teams()[0];
    assert_eq!(legacy.format, TeamFormat::Legacy);
    assert_eq!(legacy.name, "a");
    assert_eq!(legacy.auth_token, "tok");
    assert_eq!(legacy.org_id, "o1");

    let current = &store.teams()[1];
    assert_eq!(current.format, TeamFormat::Current);
    assert_eq!(current.name, "x");
    assert!(current.authorized);
    assert!(!current.needs_login);
}

#[test]
fn single_bare_record_is_tolerated() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_team_file(&tmp, r#"{"account":"x@y.com"}"#);

    let store = TeamStore::load(&path).unwrap();
    assert_eq!(store.teams().len(), 1);
    assert!(store.teams()[0].needs_login);
}

#[test]
fn missing_file_is_empty_store() {
    let tmp = tempfile::tempdir().unwrap();
    let store = TeamStore::load(tmp.path().join("nope.json")).unwrap();
    assert!(store.teams().is_empty());
}

#[test]
fn unparsable_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_team_file(&tmp, "{broken");
    assert!(TeamStore::load(&path).is_err());
}

#[test]
fn save_writes_back_discovered_data_for_current_format() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_team_file(&tmp, r#"[{"account":"x@y.com","password":"pw"}]"#);

    let mut store = TeamStore::load(&path).unwrap();
    store.set_auth_token("x", "fresh-token");
    store.set_account_id("x", "acc-9");
    store.set_authorized("x");
    assert!(store.save().unwrap());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["token"], "fresh-token");
    assert_eq!(raw[0]["account_id"], "acc-9");
    assert_eq!(raw[0]["authorized"], true);
    // Untouched fields survive the write-back
    assert_eq!(raw[0]["password"], "pw");
}

#[test]
fn save_without_changes_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_team_file(&tmp, r#"[{"account":"x@y.com","token":"t1"}]"#);

    let mut store = TeamStore::load(&path).unwrap();
    assert!(!store.save().unwrap());
}

#[test]
fn legacy_records_are_never_written_back() {
    let tmp = tempfile::tempdir().unwrap();
    let original =
        r#"[{"user":{"email":"a@b.com"},"account":{"id":"1","organizationId":"o1"},"accessToken":"tok"}]"#;
    let path = write_team_file(&tmp, original);

    let mut store = TeamStore::load(&path).unwrap();
    store.set_account_id("a", "changed");
    assert!(!store.save().unwrap());

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, original);
}

#[test]
fn reload_after_save_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_team_file(&tmp, r#"[{"account":"x@y.com"}]"#);

    let mut store = TeamStore::load(&path).unwrap();
    store.set_auth_token("x", "t2");
    store.save().unwrap();

    let reloaded = TeamStore::load(&path).unwrap();
    let team = reloaded.get("x").unwrap();
    assert_eq!(team.auth_token, "t2");
    assert!(!team.needs_login);
}
