use async_trait::async_trait;

use crate::error::{BackendError, Result};
use crate::types::{AuthCompletion, AuthProtocol, AuthSession, BackendAccount, TokenBundle};

/// Error-mapping helpers shared by the backend adapters (internal).
///
/// Each adapter implements this to translate raw HTTP statuses and response
/// bodies into the unified error type with its own backend tag.
pub(crate) trait BackendErrorMapper {
    /// Returns the backend identifier.
    fn backend_name(&self) -> &'static str;

    /// Map a non-success HTTP status to the unified error type.
    ///
    /// 401 → `InvalidCredentials`, 403 → `PermissionDenied`, everything else
    /// falls through to `Unknown` with the raw body attached. Transient
    /// statuses (429/5xx) never reach this: the transport converts them
    /// before the adapter sees the response.
    fn map_status(&self, status: u16, body: &str) -> BackendError {
        let raw = if body.is_empty() {
            None
        } else {
            Some(body.to_string())
        };
        match status {
            401 => BackendError::InvalidCredentials {
                backend: self.backend_name().to_string(),
                raw_message: raw,
            },
            403 => BackendError::PermissionDenied {
                backend: self.backend_name().to_string(),
                raw_message: raw,
            },
            _ => BackendError::Unknown {
                backend: self.backend_name().to_string(),
                raw_code: Some(status.to_string()),
                raw_message: raw.unwrap_or_else(|| format!("HTTP {status}")),
            },
        }
    }

    /// Shortcut: parse error.
    fn parse_error(&self, detail: impl ToString) -> BackendError {
        BackendError::ParseError {
            backend: self.backend_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: business-level API failure.
    fn api_error(&self, raw_code: Option<String>, raw_message: impl Into<String>) -> BackendError {
        BackendError::ApiError {
            backend: self.backend_name().to_string(),
            raw_code,
            raw_message: raw_message.into(),
        }
    }

    /// Shortcut: missing configuration field.
    fn missing_config(&self, field: &str) -> BackendError {
        BackendError::MissingConfig {
            backend: self.backend_name().to_string(),
            field: field.to_string(),
        }
    }
}

/// Account-pool backend trait.
///
/// One implementation per backend variant (CRS, CPA, S2A, Sub2API), each
/// satisfying the same capability set. The variant is selected once via
/// configuration; orchestration code never branches on the concrete type.
#[async_trait]
pub trait PoolBackend: Send + Sync {
    /// Backend identifier.
    fn id(&self) -> &'static str;

    /// Which authorization-completion protocol this backend speaks.
    ///
    /// Static per backend type; drives the orchestrator's state transitions.
    fn protocol(&self) -> AuthProtocol;

    /// Verify connectivity and credentials once at startup.
    ///
    /// Must distinguish configuration errors (`MissingConfig`), auth failures
    /// (`InvalidCredentials` / `PermissionDenied`) and network failures
    /// (`Timeout` / `NetworkError`) so the pipeline fails fast with an
    /// actionable diagnosis instead of deep inside a long-running loop.
    /// Returns a human-readable summary on success.
    async fn verify_connection(&self) -> Result<String>;

    /// Obtain an authorization URL and the opaque correlation token for a new
    /// authorization attempt.
    async fn generate_auth_url(&self) -> Result<AuthSession>;

    /// Complete an authorization attempt.
    ///
    /// Protocol-divergent (see [`AuthProtocol`]); on success the account is
    /// present in the pool; authorization without successful pool insertion
    /// is an error, not a partial success.
    async fn complete_authorization(&self, completion: &AuthCompletion) -> Result<BackendAccount>;

    /// List the accounts currently in the pool.
    async fn list_accounts(&self) -> Result<Vec<BackendAccount>>;

    /// Whether an account for this email already exists in the pool.
    ///
    /// Matched case-insensitively on the account name or the embedded
    /// credential email. Best-effort: check-then-act is not atomic against
    /// the backend.
    async fn account_exists(&self, email: &str) -> Result<bool> {
        let accounts = self.list_accounts().await?;
        Ok(accounts.iter().any(|a| a.matches_email(email)))
    }

    /// Insert an already-obtained token bundle into the pool.
    ///
    /// Idempotent only insofar as the caller first checked
    /// [`account_exists`](Self::account_exists). Backends whose pool insert
    /// happens server-side during authorization return `Unsupported`.
    async fn add_account(&self, email: &str, tokens: &TokenBundle) -> Result<BackendAccount>;
}
