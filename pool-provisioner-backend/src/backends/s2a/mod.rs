//! S2A pool backend
//!
//! Key differences from CPA/CRS:
//! - Auth: Admin API Key (`x-api-key`) preferred, JWT Bearer fallback
//! - Correlation token: `session_id`
//! - Flow: a single `create-from-oauth` call performs exchange-and-insert
//!   server-side; a two-step `add_account` path also exists
//! - Accounts carry group membership, concurrency and priority metadata

mod http;
mod backend;
mod types;

use reqwest::Client;
use tokio::sync::OnceCell;

use crate::backends::common::{TransportOptions, create_http_client, normalize_base_url};

pub(crate) use types::{S2aAccount, S2aAuthUrlData, S2aGroup, S2aResponse};

pub(crate) const GROUPS_PATH: &str = "/admin/groups";
pub(crate) const GENERATE_AUTH_URL_PATH: &str = "/admin/openai/generate-auth-url";
pub(crate) const CREATE_FROM_OAUTH_PATH: &str = "/admin/openai/create-from-oauth";
pub(crate) const ACCOUNTS_PATH: &str = "/admin/accounts";

/// Group-creation settings applied to every account this adapter inserts.
#[derive(Debug, Clone)]
pub(crate) struct S2aAccountSettings {
    pub concurrency: u32,
    pub priority: u32,
    /// Group IDs configured directly; used verbatim when non-empty.
    pub group_ids: Vec<i64>,
    /// Group names resolved against the backend when `group_ids` is empty.
    pub group_names: Vec<String>,
}

/// S2A pool backend
pub struct S2aBackend {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) admin_key: String,
    pub(crate) admin_token: String,
    pub(crate) settings: S2aAccountSettings,
    /// Resolved group IDs, cached for the process lifetime: groups do not
    /// change during a run and repeated resolution is wasteful.
    pub(crate) resolved_group_ids: OnceCell<Vec<i64>>,
}

impl S2aBackend {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_base: String,
        admin_key: String,
        admin_token: String,
        concurrency: u32,
        priority: u32,
        group_ids: Vec<i64>,
        group_names: Vec<String>,
        transport: &TransportOptions,
    ) -> Self {
        Self {
            client: create_http_client(transport),
            api_base: normalize_base_url(&api_base),
            admin_key,
            admin_token,
            settings: S2aAccountSettings {
                concurrency,
                priority,
                group_ids,
                group_names,
            },
            resolved_group_ids: OnceCell::new(),
        }
    }

    /// Which credential the adapter presents, with a short preview for logs.
    pub(crate) fn auth_method(&self) -> (&'static str, &str) {
        if !self.admin_key.is_empty() {
            ("Admin API Key", self.admin_key.as_str())
        } else if !self.admin_token.is_empty() {
            ("JWT Token", self.admin_token.as_str())
        } else {
            ("None", "")
        }
    }
}

/// Match configured group names against the backend's group listing.
///
/// Returns `(resolved IDs, names that did not match)`. Matching is
/// case-insensitive; unmatched names are dropped rather than failing the
/// call, since group membership is non-critical metadata.
pub(crate) fn match_group_ids(names: &[String], groups: &[S2aGroup]) -> (Vec<i64>, Vec<String>) {
    let mut resolved = Vec::new();
    let mut not_found = Vec::new();

    for name in names {
        let wanted = name.to_lowercase();
        match groups
            .iter()
            .find(|g| g.name.to_lowercase() == wanted)
            .and_then(|g| g.id)
        {
            Some(id) => resolved.push(id),
            None => not_found.push(name.clone()),
        }
    }

    (resolved, not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: i64, name: &str) -> S2aGroup {
        S2aGroup {
            id: Some(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn match_group_ids_case_insensitive() {
        let groups = vec![group(1, "Default"), group(2, "Codex")];
        let (resolved, not_found) =
            match_group_ids(&["default".to_string(), "CODEX".to_string()], &groups);
        assert_eq!(resolved, vec![1, 2]);
        assert!(not_found.is_empty());
    }

    #[test]
    fn match_group_ids_drops_unknown_names() {
        let groups = vec![group(1, "Default")];
        let (resolved, not_found) =
            match_group_ids(&["default".to_string(), "missing".to_string()], &groups);
        assert_eq!(resolved, vec![1]);
        assert_eq!(not_found, vec!["missing".to_string()]);
    }

    #[test]
    fn match_group_ids_empty_names() {
        let groups = vec![group(1, "Default")];
        let (resolved, not_found) = match_group_ids(&[], &groups);
        assert!(resolved.is_empty());
        assert!(not_found.is_empty());
    }
}
