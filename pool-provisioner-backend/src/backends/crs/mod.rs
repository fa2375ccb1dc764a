//! CRS pool backend
//!
//! Two-phase authorization: the extracted `code` is exchanged for a token
//! bundle via `exchange-code`, then a separate `add_account` call inserts it
//! into the pool.

mod error;
mod http;
mod backend;
mod types;

use reqwest::Client;

use crate::backends::common::{TransportOptions, create_http_client, normalize_base_url};

pub(crate) use types::{CrsAccount, CrsAuthUrlData, CrsCodexData, CrsResponse};

/// Account list endpoint, doubling as the startup verify probe (read-only).
pub(crate) const ACCOUNTS_PATH: &str = "/admin/openai-accounts";
pub(crate) const GENERATE_AUTH_URL_PATH: &str = "/admin/openai-accounts/generate-auth-url";
pub(crate) const EXCHANGE_CODE_PATH: &str = "/admin/openai-accounts/exchange-code";

/// Priority assigned to accounts inserted into the pool.
pub(crate) const DEFAULT_PRIORITY: u32 = 50;
/// Fallback token lifetime when the exchange response omits `expires_in`.
pub(crate) const DEFAULT_EXPIRES_IN: u64 = 864_000;

/// CRS pool backend
pub struct CrsBackend {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) admin_token: String,
}

impl CrsBackend {
    pub fn new(api_base: String, admin_token: String, transport: &TransportOptions) -> Self {
        Self {
            client: create_http_client(transport),
            api_base: normalize_base_url(&api_base),
            admin_token,
        }
    }
}

/// Already-known team-owner credentials imported directly into the CRS pool,
/// bypassing the interactive OAuth flow.
#[derive(Debug, Clone)]
pub struct OwnerImport {
    /// Owner email (becomes the pool account name).
    pub email: String,
    /// Access token lifted from the team store.
    pub access_token: String,
    /// Upstream user ID, if known.
    pub user_id: String,
    /// Plan type, defaults to `"team"` upstream when empty.
    pub plan_type: String,
    /// Owning organization ID, if known.
    pub organization_id: String,
}
