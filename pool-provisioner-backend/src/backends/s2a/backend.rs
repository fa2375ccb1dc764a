//! S2A `PoolBackend` trait implementation.

use async_trait::async_trait;
use serde_json::json;

use crate::error::Result;
use crate::traits::{BackendErrorMapper, PoolBackend};
use crate::types::{AuthCompletion, AuthProtocol, AuthSession, BackendAccount, TokenBundle};
use crate::utils::log_sanitizer::preview_token;

use super::types::{S2aAddAccountBody, S2aCredentialsPayload, S2aListData};
use super::{
    ACCOUNTS_PATH, CREATE_FROM_OAUTH_PATH, GENERATE_AUTH_URL_PATH, GROUPS_PATH, S2aAccount,
    S2aAuthUrlData, S2aBackend, S2aGroup, match_group_ids,
};

impl S2aBackend {
    fn account_from_api(account: S2aAccount) -> BackendAccount {
        BackendAccount {
            id: account.id.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            name: account.name,
            credential_email: account.credentials.and_then(|c| c.email),
            priority: account.priority,
            concurrency: account.concurrency,
            group_ids: account.group_ids,
        }
    }

    /// Fetch the backend's group listing (first page is ample: group counts
    /// are small).
    async fn fetch_groups(&self) -> Result<Vec<S2aGroup>> {
        let data: S2aListData<S2aGroup> = self
            .get(
                GROUPS_PATH,
                &[("page", "1".to_string()), ("page_size", "100".to_string())],
            )
            .await?;
        Ok(data.into_items())
    }

    /// Resolve the configured group membership to numeric IDs, once per
    /// process.
    ///
    /// Directly configured IDs win; otherwise names are looked up against the
    /// group listing. Unresolvable names are dropped with a warning; partial
    /// success beats aborting for non-critical metadata.
    pub(crate) async fn resolve_group_ids(&self) -> Vec<i64> {
        self.resolved_group_ids
            .get_or_init(|| async {
                if !self.settings.group_ids.is_empty() {
                    return self.settings.group_ids.clone();
                }
                if self.settings.group_names.is_empty() {
                    return vec![];
                }

                let groups = match self.fetch_groups().await {
                    Ok(groups) => groups,
                    Err(e) => {
                        log::warn!("[s2a] Group listing unavailable, names unresolved: {e}");
                        return vec![];
                    }
                };

                let (resolved, not_found) = match_group_ids(&self.settings.group_names, &groups);
                if !not_found.is_empty() {
                    log::warn!("[s2a] Groups not found: {}", not_found.join(", "));
                }
                resolved
            })
            .await
            .clone()
    }
}

#[async_trait]
impl PoolBackend for S2aBackend {
    fn id(&self) -> &'static str {
        "s2a"
    }

    fn protocol(&self) -> AuthProtocol {
        AuthProtocol::CombinedCreate
    }

    async fn verify_connection(&self) -> Result<String> {
        if self.api_base.is_empty() {
            return Err(self.missing_config("api_base"));
        }
        let (method, credential) = self.auth_method();
        if credential.is_empty() {
            return Err(self.missing_config("admin_key or admin_token"));
        }

        // Group listing supports both auth schemes, making it the cheapest probe
        let _: S2aListData<S2aGroup> = self
            .get(
                GROUPS_PATH,
                &[("page", "1".to_string()), ("page_size", "1".to_string())],
            )
            .await?;

        let group_ids = self.resolve_group_ids().await;
        let group_info = if !self.settings.group_names.is_empty() {
            format!(", groups: {:?} -> {group_ids:?}", self.settings.group_names)
        } else if !self.settings.group_ids.is_empty() {
            format!(", group IDs: {group_ids:?}")
        } else {
            String::new()
        };

        Ok(format!("Credentials valid (method: {method}{group_info})"))
    }

    async fn generate_auth_url(&self) -> Result<AuthSession> {
        let data: S2aAuthUrlData = self.post(GENERATE_AUTH_URL_PATH, &json!({})).await?;

        let (Some(auth_url), Some(session_id)) = (data.auth_url, data.session_id) else {
            return Err(self.parse_error("response missing auth_url or session_id field"));
        };

        log::info!(
            "[s2a] Auth URL generated (session: {})",
            preview_token(&session_id)
        );
        Ok(AuthSession {
            auth_url,
            handle: session_id,
        })
    }

    /// Single combined call: the backend exchanges the code and inserts the
    /// account server-side.
    async fn complete_authorization(&self, completion: &AuthCompletion) -> Result<BackendAccount> {
        let code = completion
            .callback
            .code
            .as_deref()
            .ok_or_else(|| self.parse_error("callback URL carries no code parameter"))?;

        let mut payload = json!({
            "session_id": completion.session.handle,
            "code": code,
            "concurrency": self.settings.concurrency,
            "priority": self.settings.priority,
        });
        if !completion.name.is_empty() {
            payload["name"] = json!(completion.name);
        }
        let group_ids = self.resolve_group_ids().await;
        if !group_ids.is_empty() {
            payload["group_ids"] = json!(group_ids);
        }

        let account: S2aAccount = self.post(CREATE_FROM_OAUTH_PATH, &payload).await?;
        log::info!(
            "[s2a] Account created (ID: {:?}, Name: {})",
            account.id,
            account.name
        );
        Ok(Self::account_from_api(account))
    }

    async fn list_accounts(&self) -> Result<Vec<BackendAccount>> {
        let data: S2aListData<S2aAccount> = self
            .get(ACCOUNTS_PATH, &[("platform", "openai".to_string())])
            .await?;
        Ok(data
            .into_items()
            .into_iter()
            .map(Self::account_from_api)
            .collect())
    }

    async fn add_account(&self, email: &str, tokens: &TokenBundle) -> Result<BackendAccount> {
        let body = S2aAddAccountBody {
            name: email.to_string(),
            platform: "openai".to_string(),
            account_type: "oauth".to_string(),
            credentials: S2aCredentialsPayload {
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                expires_at: tokens.expires_at,
                id_token: tokens.id_token.clone(),
                email: tokens.email.clone(),
            },
            concurrency: self.settings.concurrency,
            priority: self.settings.priority,
            auto_pause_on_expired: true,
            group_ids: self.resolve_group_ids().await,
        };

        let account: S2aAccount = self.post(ACCOUNTS_PATH, &body).await?;
        log::info!("[s2a] Account added (ID: {:?}, Name: {email})", account.id);
        Ok(Self::account_from_api(account))
    }
}
