//! Sub2API `PoolBackend` trait implementation.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::traits::{BackendErrorMapper, PoolBackend};
use crate::types::{AuthCompletion, AuthProtocol, AuthSession, BackendAccount, TokenBundle};
use crate::utils::log_sanitizer::preview_token;

use super::types::extract_items;
use super::{
    ACCOUNTS_PATH, CREATE_FROM_OAUTH_PATH, GENERATE_AUTH_URL_PATH, Sub2apiAccount, Sub2apiAuthUrlData,
    Sub2apiBackend,
};

impl Sub2apiBackend {
    fn account_from_api(account: Sub2apiAccount) -> BackendAccount {
        BackendAccount {
            id: account.id.map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            }),
            name: account.name,
            credential_email: account
                .credentials
                .and_then(|c| c.email)
                .or(account.extra.and_then(|e| e.email)),
            priority: account.priority,
            concurrency: account.concurrency,
            group_ids: account.group_ids,
        }
    }

    /// Search the pool for an OpenAI OAuth account matching this email.
    async fn find_account(&self, email: &str) -> Result<Option<Sub2apiAccount>> {
        let payload = self
            .get_value(
                ACCOUNTS_PATH,
                &[
                    ("platform", "openai".to_string()),
                    ("type", "oauth".to_string()),
                    ("search", email.trim().to_string()),
                    ("page", "1".to_string()),
                    ("page_size", "20".to_string()),
                ],
            )
            .await?;

        for item in extract_items(payload) {
            let Ok(account) = serde_json::from_value::<Sub2apiAccount>(item) else {
                continue;
            };
            if account.matches_email(email) {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl PoolBackend for Sub2apiBackend {
    fn id(&self) -> &'static str {
        "sub2api"
    }

    fn protocol(&self) -> AuthProtocol {
        AuthProtocol::CombinedCreate
    }

    async fn verify_connection(&self) -> Result<String> {
        if self.api_base.is_empty() {
            return Err(self.missing_config("api_base"));
        }
        if self.admin_api_key.is_empty() && self.admin_jwt.is_empty() {
            return Err(self.missing_config("admin_api_key or admin_jwt"));
        }

        let _ = self
            .get_value(
                ACCOUNTS_PATH,
                &[
                    ("platform", "openai".to_string()),
                    ("page", "1".to_string()),
                    ("page_size", "1".to_string()),
                ],
            )
            .await?;

        let method = if self.admin_api_key.is_empty() {
            "JWT Token"
        } else {
            "Admin API Key"
        };
        Ok(format!("Credentials valid (method: {method})"))
    }

    async fn generate_auth_url(&self) -> Result<AuthSession> {
        let mut payload = json!({});
        if let Some(proxy_id) = self.proxy_id {
            payload["proxy_id"] = json!(proxy_id);
        }

        let data = self.post_value(GENERATE_AUTH_URL_PATH, &payload).await?;
        let data: Sub2apiAuthUrlData =
            serde_json::from_value(data).map_err(|e| self.parse_error(e))?;

        let (Some(auth_url), Some(session_id)) = (data.auth_url, data.session_id) else {
            return Err(self.parse_error("response missing auth_url or session_id field"));
        };

        log::info!(
            "[sub2api] Auth URL generated (session: {})",
            preview_token(&session_id)
        );
        Ok(AuthSession {
            auth_url,
            handle: session_id,
        })
    }

    /// The backend performs exchange-code plus create-account server-side.
    async fn complete_authorization(&self, completion: &AuthCompletion) -> Result<BackendAccount> {
        let code = completion
            .callback
            .code
            .as_deref()
            .ok_or_else(|| self.parse_error("callback URL carries no code parameter"))?;

        // Empty values are omitted to avoid binding ambiguity server-side
        let mut payload = json!({
            "session_id": completion.session.handle,
            "code": code,
            "concurrency": self.concurrency,
            "priority": self.priority,
        });
        if !completion.name.is_empty() {
            payload["name"] = json!(completion.name);
        }
        if let Some(proxy_id) = self.proxy_id {
            payload["proxy_id"] = json!(proxy_id);
        }
        if !self.group_ids.is_empty() {
            payload["group_ids"] = json!(self.group_ids);
        }

        let data = self.post_value(CREATE_FROM_OAUTH_PATH, &payload).await?;
        let account: Sub2apiAccount =
            serde_json::from_value(data).map_err(|e| self.parse_error(e))?;

        log::info!(
            "[sub2api] Account added to pool (ID: {:?})",
            account.id
        );
        Ok(Self::account_from_api(account))
    }

    async fn list_accounts(&self) -> Result<Vec<BackendAccount>> {
        let payload = self
            .get_value(
                ACCOUNTS_PATH,
                &[
                    ("platform", "openai".to_string()),
                    ("type", "oauth".to_string()),
                ],
            )
            .await?;

        Ok(extract_items(payload)
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Sub2apiAccount>(item).ok())
            .map(Self::account_from_api)
            .collect())
    }

    /// The search endpoint is cheaper and more precise than listing the whole
    /// pool, so the default list-and-scan implementation is overridden.
    async fn account_exists(&self, email: &str) -> Result<bool> {
        Ok(self.find_account(email).await?.is_some())
    }

    async fn add_account(&self, email: &str, tokens: &TokenBundle) -> Result<BackendAccount> {
        let mut credentials = json!({
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
        });
        if let Some(expires_at) = tokens.expires_at {
            credentials["expires_at"] = json!(expires_at);
        }
        if let Some(id_token) = &tokens.id_token {
            credentials["id_token"] = json!(id_token);
        }
        if let Some(cred_email) = &tokens.email {
            credentials["email"] = json!(cred_email);
        }

        let mut payload = json!({
            "name": email,
            "platform": "openai",
            "type": "oauth",
            "credentials": credentials,
            "concurrency": self.concurrency,
            "priority": self.priority,
            "auto_pause_on_expired": true,
        });
        if let Some(proxy_id) = self.proxy_id {
            payload["proxy_id"] = json!(proxy_id);
        }
        if !self.group_ids.is_empty() {
            payload["group_ids"] = json!(self.group_ids);
        }

        let data = self.post_value(ACCOUNTS_PATH, &payload).await?;
        let account: Sub2apiAccount =
            serde_json::from_value(data).map_err(|e| self.parse_error(e))?;
        log::info!("[sub2api] Account added (ID: {:?}, Name: {email})", account.id);
        Ok(Self::account_from_api(account))
    }
}
