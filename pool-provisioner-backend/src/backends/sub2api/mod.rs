//! Sub2API pool backend
//!
//! Speaks the same admin auth scheme as S2A (`x-api-key` preferred, JWT
//! Bearer fallback) but a different API surface: versioned paths, a loosely
//! wrapped `{ data: ... }` envelope that is sometimes nested one level deep,
//! and camelCase/snake_case field aliases. The response handling here is
//! deliberately conservative about shape.

mod http;
mod backend;
mod types;

use reqwest::Client;

use crate::backends::common::{TransportOptions, create_http_client, normalize_base_url};

pub(crate) use types::{Sub2apiAccount, Sub2apiAuthUrlData};

pub(crate) const GENERATE_AUTH_URL_PATH: &str = "/api/v1/admin/openai/generate-auth-url";
pub(crate) const CREATE_FROM_OAUTH_PATH: &str = "/api/v1/admin/openai/create-from-oauth";
pub(crate) const ACCOUNTS_PATH: &str = "/api/v1/admin/accounts";

/// Sub2API pool backend
pub struct Sub2apiBackend {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) admin_api_key: String,
    pub(crate) admin_jwt: String,
    pub(crate) concurrency: u32,
    pub(crate) priority: u32,
    pub(crate) group_ids: Vec<i64>,
    pub(crate) proxy_id: Option<i64>,
}

impl Sub2apiBackend {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_base: String,
        admin_api_key: String,
        admin_jwt: String,
        concurrency: u32,
        priority: u32,
        group_ids: Vec<i64>,
        proxy_id: Option<i64>,
        transport: &TransportOptions,
    ) -> Self {
        Self {
            client: create_http_client(transport),
            api_base: normalize_base_url(&api_base),
            admin_api_key,
            admin_jwt,
            concurrency,
            priority,
            group_ids,
            proxy_id,
        }
    }
}
