//! Browser-automation seams.

use async_trait::async_trait;

use crate::error::CoreResult;

/// Driver for the browser-based registration and login steps.
///
/// Implementations own their page/session state; the pipeline never sees a
/// page handle.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Register a fresh account. Returns whether registration succeeded.
    async fn register(&self, email: &str, password: &str) -> CoreResult<bool>;

    /// Log an existing account in. Returns whether login succeeded.
    async fn login(&self, email: &str, password: &str) -> CoreResult<bool>;

    /// Whether the browser currently holds a logged-in session.
    async fn is_logged_in(&self) -> CoreResult<bool>;
}

/// Human-in-the-loop hand-off for an authorization attempt.
///
/// Presents the authorization URL (typically by navigating the browser) and
/// returns the URL the flow landed on, expected (but not guaranteed) to be
/// the local OAuth callback.
#[async_trait]
pub trait AuthorizationHandoff: Send + Sync {
    async fn obtain_callback(&self, auth_url: &str) -> CoreResult<String>;
}
