#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for the file-backed stores: `DomainBlacklist` and
//! `CsvExporter`.

use pool_provisioner_core::services::{CsvExporter, DomainBlacklist, ExportRecord};

// ===== DomainBlacklist =====

#[test]
fn blacklist_add_and_contains() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("domain_blacklist.json");

    let mut blacklist = DomainBlacklist::load(&path);
    assert!(blacklist.add("bad.example.com").unwrap());
    assert!(!blacklist.add("bad.example.com").unwrap());
    assert!(blacklist.contains("bad.example.com"));
    assert!(!blacklist.contains("good.example.com"));
}

#[test]
fn blacklist_matches_email_domain() {
    let tmp = tempfile::tempdir().unwrap();
    let mut blacklist = DomainBlacklist::load(tmp.path().join("domain_blacklist.json"));
    blacklist.add("bad.example.com").unwrap();

    assert!(blacklist.is_email_blacklisted("seat@bad.example.com"));
    assert!(!blacklist.is_email_blacklisted("seat@good.example.com"));
    assert!(!blacklist.is_email_blacklisted("not-an-email"));
}

#[test]
fn blacklist_persists_across_reloads() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("domain_blacklist.json");

    let mut blacklist = DomainBlacklist::load(&path);
    blacklist.add("bad.example.com").unwrap();

    let reloaded = DomainBlacklist::load(&path);
    assert!(reloaded.contains("bad.example.com"));

    // On-disk shape is {"domains": [...]}
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["domains"].as_array().unwrap().len() == 1);
}

#[test]
fn blacklist_empty_domain_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut blacklist = DomainBlacklist::load(tmp.path().join("domain_blacklist.json"));
    assert!(!blacklist.add("").unwrap());
}

// ===== CsvExporter =====

fn record(email: &str) -> ExportRecord {
    ExportRecord {
        email: email.to_string(),
        password: "pw".to_string(),
        team: "team-a".to_string(),
        status: "success".to_string(),
        pool_id: "pool-1".to_string(),
    }
}

#[test]
fn csv_header_written_once() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("accounts.csv");

    let exporter = CsvExporter::new(&path);
    exporter.append(&record("a@b.com")).unwrap();
    exporter.append(&record("c@d.com")).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "email,password,team,status,crs_id,timestamp");
    assert!(lines[1].starts_with("a@b.com,pw,team-a,success,pool-1,"));
    assert!(lines[2].starts_with("c@d.com,"));
}

#[test]
fn csv_appends_to_existing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("accounts.csv");

    CsvExporter::new(&path).append(&record("a@b.com")).unwrap();
    // A second exporter instance must not rewrite the header
    CsvExporter::new(&path).append(&record("c@d.com")).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("email,password").count(), 1);
}

#[test]
fn csv_quotes_awkward_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("accounts.csv");

    let mut rec = record("a@b.com");
    rec.password = "pw,with\"comma".to_string();
    CsvExporter::new(&path).append(&rec).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"pw,with\"\"comma\""));
}
