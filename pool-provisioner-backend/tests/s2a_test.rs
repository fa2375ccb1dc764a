//! S2A backend integration tests.
//!
//! Run against a live S2A instance; skipped unless `S2A_API_BASE` and one of
//! `S2A_ADMIN_KEY` / `S2A_ADMIN_TOKEN` are set.

mod common;

use common::{TestContext, generate_test_email};

#[tokio::test]
async fn verify_connection() {
    skip_if_no_credentials!("S2A_API_BASE");

    let Some(ctx) = TestContext::s2a() else {
        eprintln!("Skipping test: no S2A admin credential configured");
        return;
    };
    let summary = require_ok!(ctx.backend.verify_connection().await);
    assert!(summary.contains("Credentials valid"));
}

#[tokio::test]
async fn generate_auth_url_returns_session() {
    skip_if_no_credentials!("S2A_API_BASE");

    let Some(ctx) = TestContext::s2a() else {
        eprintln!("Skipping test: no S2A admin credential configured");
        return;
    };
    let session = require_ok!(ctx.backend.generate_auth_url().await);
    assert!(session.auth_url.starts_with("http"));
    assert!(!session.handle.is_empty());
}

#[tokio::test]
async fn nonexistent_account_does_not_exist() {
    skip_if_no_credentials!("S2A_API_BASE");

    let Some(ctx) = TestContext::s2a() else {
        eprintln!("Skipping test: no S2A admin credential configured");
        return;
    };
    let email = generate_test_email();
    let exists = require_ok!(ctx.backend.account_exists(&email).await);
    assert!(!exists);
}
