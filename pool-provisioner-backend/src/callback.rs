//! Authorization-callback URL recognition and parsing.
//!
//! A URL is treated as an authorization callback only if it matches the fixed
//! local redirect pattern and carries a `code` query parameter. This is how a
//! user-navigated browser page is told apart from the OAuth callback target
//! without depending on any window or tab lifecycle event.

use url::Url;

/// The fixed local redirect target every backend's OAuth flow lands on.
pub const CALLBACK_HOST: &str = "localhost:1455";
/// Path component of the callback target.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Parsed contents of an authorization callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackInfo {
    /// Authorization code, if present.
    pub code: Option<String>,
    /// OAuth scope echoed back, if present.
    pub scope: Option<String>,
    /// Correlation `state` token, if present.
    pub state: Option<String>,
    /// The full callback URL as received.
    pub full_url: String,
}

impl CallbackInfo {
    /// Parse a URL's query parameters into callback info.
    ///
    /// Returns `None` when the URL cannot be parsed at all; missing
    /// parameters are represented as `None` fields, not a parse failure.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        if url.is_empty() {
            return None;
        }
        let parsed = Url::parse(url).ok()?;

        let mut code = None;
        let mut scope = None;
        let mut state = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "scope" => scope = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                _ => {}
            }
        }

        Some(Self {
            code,
            scope,
            state,
            full_url: url.to_string(),
        })
    }
}

/// Whether a URL is the authorization callback target.
///
/// Requires both the fixed local redirect pattern and a `code` parameter;
/// a callback that only carries `state` (user cancelled, error redirect)
/// does not qualify.
#[must_use]
pub fn is_auth_callback_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    url.contains(&format!("{CALLBACK_HOST}{CALLBACK_PATH}")) && url.contains("code=")
}

/// Extract the authorization code from a callback URL, if present.
#[must_use]
pub fn extract_code_from_url(url: &str) -> Option<String> {
    CallbackInfo::parse(url)?.code
}
