//! Sub2API backend integration tests.
//!
//! Run against a live Sub2API instance; skipped unless `SUB2API_API_BASE`
//! and one of `SUB2API_ADMIN_API_KEY` / `SUB2API_ADMIN_JWT` are set.

mod common;

use common::{TestContext, generate_test_email};

#[tokio::test]
async fn verify_connection() {
    skip_if_no_credentials!("SUB2API_API_BASE");

    let Some(ctx) = TestContext::sub2api() else {
        eprintln!("Skipping test: no Sub2API admin credential configured");
        return;
    };
    let summary = require_ok!(ctx.backend.verify_connection().await);
    assert!(summary.contains("Credentials valid"));
}

#[tokio::test]
async fn generate_auth_url_returns_session() {
    skip_if_no_credentials!("SUB2API_API_BASE");

    let Some(ctx) = TestContext::sub2api() else {
        eprintln!("Skipping test: no Sub2API admin credential configured");
        return;
    };
    let session = require_ok!(ctx.backend.generate_auth_url().await);
    assert!(session.auth_url.starts_with("http"));
    assert!(!session.handle.is_empty());
}

#[tokio::test]
async fn nonexistent_account_does_not_exist() {
    skip_if_no_credentials!("SUB2API_API_BASE");

    let Some(ctx) = TestContext::sub2api() else {
        eprintln!("Skipping test: no Sub2API admin credential configured");
        return;
    };
    let email = generate_test_email();
    let exists = require_ok!(ctx.backend.account_exists(&email).await);
    assert!(!exists);
}
