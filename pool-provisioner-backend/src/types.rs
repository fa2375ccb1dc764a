use serde::{Deserialize, Serialize};

use crate::callback::CallbackInfo;

// ============ Backend Types ============

/// Identifies which pool-backend implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// CRS admin service. Requires feature `crs`.
    #[cfg(feature = "crs")]
    Crs,
    /// CPA admin service. Requires feature `cpa`.
    #[cfg(feature = "cpa")]
    Cpa,
    /// S2A admin service. Requires feature `s2a`.
    #[cfg(feature = "s2a")]
    S2a,
    /// Sub2API admin service. Requires feature `sub2api`.
    #[cfg(feature = "sub2api")]
    Sub2api,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "crs")]
            Self::Crs => write!(f, "crs"),
            #[cfg(feature = "cpa")]
            Self::Cpa => write!(f, "cpa"),
            #[cfg(feature = "s2a")]
            Self::S2a => write!(f, "s2a"),
            #[cfg(feature = "sub2api")]
            Self::Sub2api => write!(f, "sub2api"),
        }
    }
}

/// How a backend completes an authorization attempt.
///
/// Decided statically by the configured backend type, never inferred from
/// responses at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProtocol {
    /// The caller submits the extracted `code`; the backend exchanges it for
    /// tokens in one call, and a separate add-account call inserts the result
    /// into the pool (CRS).
    CodeExchange,
    /// The caller submits the entire callback URL; the backend performs the
    /// exchange asynchronously and a status endpoint is polled until it
    /// reports success (CPA).
    CallbackPoll,
    /// A single combined call performs exchange-and-insert server-side
    /// (S2A, Sub2API).
    CombinedCreate,
}

// ============ Credentials ============

/// Connection credentials for a pool backend, one variant per service.
///
/// The variant selects the concrete adapter in [`create_backend`](crate::create_backend).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum BackendCredentials {
    /// CRS: Bearer admin token.
    #[cfg(feature = "crs")]
    Crs {
        /// Base URL of the CRS admin API.
        api_base: String,
        /// Admin token sent as `Authorization: Bearer`.
        admin_token: String,
    },
    /// CPA: Bearer admin-panel password, plus the polling discipline used to
    /// wait for asynchronous authorization completion.
    #[cfg(feature = "cpa")]
    Cpa {
        /// Base URL of the CPA management API.
        api_base: String,
        /// Admin-panel password sent as `Authorization: Bearer`.
        admin_password: String,
        /// Whether to request the web-UI flavor of the auth URL.
        #[serde(default = "default_true")]
        is_webui: bool,
        /// Seconds between authorization-status polls.
        #[serde(default = "default_poll_interval")]
        poll_interval_secs: u64,
        /// Maximum number of authorization-status polls before timing out.
        #[serde(default = "default_poll_max_retries")]
        poll_max_retries: u32,
    },
    /// S2A: admin API key (`x-api-key`) preferred, JWT Bearer fallback.
    #[cfg(feature = "s2a")]
    S2a {
        /// Base URL of the S2A admin API.
        api_base: String,
        /// Admin API key, sent as `x-api-key` when present.
        #[serde(default)]
        admin_key: String,
        /// JWT admin token, sent as `Authorization: Bearer` when no API key
        /// is configured.
        #[serde(default)]
        admin_token: String,
        /// Concurrency assigned to created accounts.
        #[serde(default = "default_concurrency")]
        concurrency: u32,
        /// Priority assigned to created accounts.
        #[serde(default = "default_priority")]
        priority: u32,
        /// Group IDs assigned verbatim to created accounts.
        #[serde(default)]
        group_ids: Vec<i64>,
        /// Group names resolved against the backend's group listing when
        /// `group_ids` is empty.
        #[serde(default)]
        group_names: Vec<String>,
    },
    /// Sub2API: admin API key (`x-api-key`) preferred, JWT Bearer fallback.
    #[cfg(feature = "sub2api")]
    Sub2api {
        /// Base URL of the Sub2API service (trailing `/` tolerated).
        api_base: String,
        /// Admin API key, sent as `x-api-key` when present.
        #[serde(default)]
        admin_api_key: String,
        /// Admin JWT, sent as `Authorization: Bearer` when no API key is
        /// configured.
        #[serde(default)]
        admin_jwt: String,
        /// Concurrency assigned to created accounts.
        #[serde(default = "default_concurrency")]
        concurrency: u32,
        /// Priority assigned to created accounts.
        #[serde(default = "default_priority")]
        priority: u32,
        /// Group IDs assigned to created accounts.
        #[serde(default)]
        group_ids: Vec<i64>,
        /// Upstream proxy ID forwarded to the service, if any.
        #[serde(default)]
        proxy_id: Option<i64>,
    },
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    3
}

fn default_poll_max_retries() -> u32 {
    20
}

fn default_concurrency() -> u32 {
    10
}

fn default_priority() -> u32 {
    50
}

// ============ Authorization Session ============

/// An in-flight authorization attempt: the URL the human must visit plus the
/// backend's opaque correlation token (`session_id` or `state` depending on
/// the backend).
///
/// Ephemeral: its lifetime is bounded by the orchestration attempt and the
/// polling budget; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authorization URL to present to the human.
    pub auth_url: String,
    /// Opaque correlation token for this attempt.
    pub handle: String,
}

/// Everything a backend needs to complete an authorization attempt:
/// the session issued by `generate_auth_url` and the parsed callback the
/// human landed on, plus the pool-account name to record.
#[derive(Debug, Clone)]
pub struct AuthCompletion {
    /// Session issued by [`generate_auth_url`](crate::PoolBackend::generate_auth_url).
    pub session: AuthSession,
    /// Parsed authorization callback.
    pub callback: CallbackInfo,
    /// Account name to record in the pool (the email).
    pub name: String,
}

// ============ Token Bundle ============

/// OAuth token material imported into a pool backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenBundle {
    /// OAuth access token.
    pub access_token: String,
    /// OAuth refresh token (may be empty for session-derived imports).
    #[serde(default)]
    pub refresh_token: String,
    /// OpenID Connect ID token, if the flow produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Token lifetime in seconds, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Absolute expiry (Unix seconds), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Email embedded in the credential, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ============ Backend Account ============

/// The external representation of an account in a pool backend, normalized
/// across variants.
///
/// `name` (the email) is the natural key used for existence checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendAccount {
    /// Backend-assigned account ID, if reported.
    #[serde(default)]
    pub id: Option<String>,
    /// Account name (the email).
    pub name: String,
    /// Email embedded in the stored credential, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_email: Option<String>,
    /// Scheduling priority, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    /// Concurrency limit, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u32>,
    /// Group memberships, if reported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<i64>,
}

impl BackendAccount {
    /// Case-insensitive match against an email, on the account name or the
    /// embedded credential email.
    #[must_use]
    pub fn matches_email(&self, email: &str) -> bool {
        let needle = email.trim().to_lowercase();
        if self.name.trim().to_lowercase() == needle {
            return true;
        }
        self.credential_email
            .as_deref()
            .is_some_and(|e| e.trim().to_lowercase() == needle)
    }
}
