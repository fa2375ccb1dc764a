//! CRS `PoolBackend` trait implementation.

use async_trait::async_trait;
use serde_json::json;

use crate::error::{BackendError, Result};
use crate::traits::{BackendErrorMapper, PoolBackend};
use crate::types::{AuthCompletion, AuthProtocol, AuthSession, BackendAccount, TokenBundle};
use crate::utils::log_sanitizer::preview_token;

use super::{
    ACCOUNTS_PATH, CrsAccount, CrsAuthUrlData, CrsBackend, CrsCodexData, DEFAULT_EXPIRES_IN,
    DEFAULT_PRIORITY, EXCHANGE_CODE_PATH, GENERATE_AUTH_URL_PATH, OwnerImport,
};
use super::types::{CrsAddAccountBody, CrsOauthPayload};

impl CrsBackend {
    fn account_from_api(account: CrsAccount) -> BackendAccount {
        BackendAccount {
            id: account.id,
            name: account.name,
            credential_email: None,
            priority: account.priority,
            concurrency: None,
            group_ids: vec![],
        }
    }

    /// Exchange an authorization code for a token bundle.
    async fn exchange_code(&self, code: &str, session_id: &str) -> Result<CrsCodexData> {
        let payload = json!({ "code": code, "sessionId": session_id });
        let data: CrsCodexData = self.post(EXCHANGE_CODE_PATH, &payload).await?;
        log::info!("[crs] Authorization code exchanged");
        Ok(data)
    }

    async fn add_account_body(&self, body: &CrsAddAccountBody) -> Result<BackendAccount> {
        let account: CrsAccount = self.post(ACCOUNTS_PATH, body).await?;
        log::info!(
            "[crs] Account added to pool (ID: {})",
            account.id.as_deref().unwrap_or("<none>")
        );
        Ok(Self::account_from_api(account))
    }

    /// Import already-known team-owner credentials directly into the pool.
    ///
    /// Used by the bulk owner-sync pass; skips the interactive OAuth flow
    /// entirely. The stored access token has no refresh/ID token companion.
    pub async fn add_owner_account(&self, import: &OwnerImport) -> Result<BackendAccount> {
        let body = CrsAddAccountBody {
            name: import.email.clone(),
            description: "Team Owner (from team store)".to_string(),
            account_type: "shared".to_string(),
            proxy: None,
            openai_oauth: CrsOauthPayload {
                id_token: String::new(),
                access_token: import.access_token.clone(),
                refresh_token: String::new(),
                expires_in: DEFAULT_EXPIRES_IN,
            },
            account_info: json!({
                "user_id": import.user_id,
                "email": import.email,
                "plan_type": if import.plan_type.is_empty() { "team" } else { &import.plan_type },
                "organization_id": import.organization_id,
            }),
            priority: DEFAULT_PRIORITY,
        };
        self.add_account_body(&body).await
    }
}

#[async_trait]
impl PoolBackend for CrsBackend {
    fn id(&self) -> &'static str {
        "crs"
    }

    fn protocol(&self) -> AuthProtocol {
        AuthProtocol::CodeExchange
    }

    async fn verify_connection(&self) -> Result<String> {
        if self.api_base.is_empty() {
            return Err(self.missing_config("api_base"));
        }
        if self.admin_token.is_empty() {
            return Err(self.missing_config("admin_token"));
        }

        // Read-only list call, safe as a probe
        let accounts: Vec<CrsAccount> = self.get(ACCOUNTS_PATH).await?;
        Ok(format!(
            "Token valid ({} accounts already in pool)",
            accounts.len()
        ))
    }

    async fn generate_auth_url(&self) -> Result<AuthSession> {
        let data: CrsAuthUrlData = self.post(GENERATE_AUTH_URL_PATH, &json!({})).await?;
        log::info!(
            "[crs] Auth URL generated (session: {})",
            preview_token(&data.session_id)
        );
        Ok(AuthSession {
            auth_url: data.auth_url,
            handle: data.session_id,
        })
    }

    async fn complete_authorization(&self, completion: &AuthCompletion) -> Result<BackendAccount> {
        let code = completion
            .callback
            .code
            .as_deref()
            .ok_or_else(|| self.parse_error("callback URL carries no code parameter"))?;

        let codex = self.exchange_code(code, &completion.session.handle).await?;

        let body = CrsAddAccountBody {
            name: completion.name.clone(),
            description: String::new(),
            account_type: "shared".to_string(),
            proxy: None,
            openai_oauth: CrsOauthPayload {
                id_token: codex.tokens.id_token.unwrap_or_default(),
                access_token: codex.tokens.access_token.unwrap_or_default(),
                refresh_token: codex.tokens.refresh_token.unwrap_or_default(),
                expires_in: codex.tokens.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
            },
            account_info: codex.account_info,
            priority: DEFAULT_PRIORITY,
        };
        self.add_account_body(&body).await
    }

    async fn list_accounts(&self) -> Result<Vec<BackendAccount>> {
        let accounts: Vec<CrsAccount> = self.get(ACCOUNTS_PATH).await?;
        Ok(accounts.into_iter().map(Self::account_from_api).collect())
    }

    async fn add_account(&self, email: &str, tokens: &TokenBundle) -> Result<BackendAccount> {
        if tokens.access_token.is_empty() {
            return Err(BackendError::SerializationError {
                backend: "crs".to_string(),
                detail: "token bundle has no access token".to_string(),
            });
        }

        let body = CrsAddAccountBody {
            name: email.to_string(),
            description: String::new(),
            account_type: "shared".to_string(),
            proxy: None,
            openai_oauth: CrsOauthPayload {
                id_token: tokens.id_token.clone().unwrap_or_default(),
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                expires_in: tokens.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
            },
            account_info: json!({ "email": email }),
            priority: DEFAULT_PRIORITY,
        };
        self.add_account_body(&body).await
    }
}
