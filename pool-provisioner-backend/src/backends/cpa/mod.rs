//! CPA pool backend
//!
//! Key differences from CRS:
//! - Auth: Bearer + admin-panel password, not an admin token
//! - Correlation token: `state`, not `session_id`
//! - Flow: the full callback URL is submitted, then a status endpoint is
//!   polled until authorization completes
//! - Pool insertion happens server-side after the callback; there is no
//!   separate add-account call

mod http;
mod backend;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::backends::common::{TransportOptions, create_http_client, normalize_base_url};

pub(crate) use types::{CpaAuthStatus, CpaAuthUrl};

pub(crate) const AUTH_URL_PATH: &str = "/v0/management/codex-auth-url";
pub(crate) const OAUTH_CALLBACK_PATH: &str = "/v0/management/oauth-callback";
pub(crate) const AUTH_STATUS_PATH: &str = "/v0/management/get-auth-status";

/// CPA pool backend
pub struct CpaBackend {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) admin_password: String,
    pub(crate) is_webui: bool,
    pub(crate) poll_interval: Duration,
    pub(crate) poll_max_retries: u32,
}

impl CpaBackend {
    pub fn new(
        api_base: String,
        admin_password: String,
        is_webui: bool,
        poll_interval_secs: u64,
        poll_max_retries: u32,
        transport: &TransportOptions,
    ) -> Self {
        Self {
            client: create_http_client(transport),
            api_base: normalize_base_url(&api_base),
            admin_password,
            is_webui,
            poll_interval: Duration::from_secs(poll_interval_secs),
            poll_max_retries,
        }
    }
}
