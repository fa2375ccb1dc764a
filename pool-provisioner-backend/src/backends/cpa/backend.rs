//! CPA `PoolBackend` trait implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{BackendError, Result};
use crate::traits::{BackendErrorMapper, PoolBackend};
use crate::types::{AuthCompletion, AuthProtocol, AuthSession, BackendAccount, TokenBundle};
use crate::utils::log_sanitizer::preview_token;

use super::{AUTH_STATUS_PATH, AUTH_URL_PATH, CpaAuthStatus, CpaAuthUrl, CpaBackend,
    OAUTH_CALLBACK_PATH};

/// One authorization-status check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PollStatus {
    /// Authorization completed.
    Ok,
    /// Still in flight; keep polling. Carries the reported status string.
    Pending(String),
    /// The backend reported a terminal failure status.
    Rejected(String),
}

/// Poll a status check at a fixed interval until it succeeds, is rejected,
/// or the attempt budget runs out.
///
/// Factored out of the adapter so the termination discipline is testable
/// without a live backend. Per-attempt progress stays at debug level so a
/// long wait does not flood the log.
pub(crate) async fn poll_until_ok<F, Fut>(
    backend: &str,
    interval: Duration,
    max_retries: u32,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus>>,
{
    for attempt in 1..=max_retries {
        match check().await? {
            PollStatus::Ok => {
                log::info!("[{backend}] Authorization confirmed after {attempt} poll(s)");
                return Ok(());
            }
            PollStatus::Rejected(status) => {
                return Err(BackendError::AuthorizationRejected {
                    backend: backend.to_string(),
                    status,
                });
            }
            PollStatus::Pending(status) => {
                log::debug!("[{backend}] Polling auth status {attempt}/{max_retries}: {status}");
            }
        }
        if attempt < max_retries {
            tokio::time::sleep(interval).await;
        }
    }

    Err(BackendError::AuthorizationTimeout {
        backend: backend.to_string(),
        attempts: max_retries,
        waited_secs: interval.as_secs() * u64::from(max_retries.saturating_sub(1)),
    })
}

impl CpaBackend {
    fn is_webui_param(&self) -> (&'static str, String) {
        ("is_webui", self.is_webui.to_string())
    }

    /// Submit the full OAuth callback URL; the backend performs the code
    /// exchange asynchronously.
    async fn submit_callback(&self, redirect_url: &str) -> Result<()> {
        let payload = json!({ "provider": "codex", "redirect_url": redirect_url });
        self.post_unit(OAUTH_CALLBACK_PATH, &payload).await?;
        log::info!("[cpa] Callback URL submitted");
        Ok(())
    }

    /// One authorization-status check. Only `"ok"` is success; a terminal
    /// failure status stops the poll early, anything else keeps polling.
    async fn check_auth_status(&self, state: &str) -> Result<PollStatus> {
        let resp: CpaAuthStatus = self
            .get(AUTH_STATUS_PATH, &[("state", state.to_string())])
            .await?;
        Ok(match resp.status.as_str() {
            "ok" => PollStatus::Ok,
            "failed" | "error" => PollStatus::Rejected(resp.status),
            _ => PollStatus::Pending(resp.status),
        })
    }
}

#[async_trait]
impl PoolBackend for CpaBackend {
    fn id(&self) -> &'static str {
        "cpa"
    }

    fn protocol(&self) -> AuthProtocol {
        AuthProtocol::CallbackPoll
    }

    async fn verify_connection(&self) -> Result<String> {
        if self.api_base.is_empty() {
            return Err(self.missing_config("api_base"));
        }
        if self.admin_password.is_empty() {
            return Err(self.missing_config("admin_password"));
        }

        // The auth-url endpoint doubles as the connection probe
        let resp: CpaAuthUrl = self.get(AUTH_URL_PATH, &[self.is_webui_param()]).await?;
        if resp.url.is_some() && resp.state.is_some() {
            Ok("Service reachable".to_string())
        } else {
            Ok("Service reachable (response shape may have changed)".to_string())
        }
    }

    async fn generate_auth_url(&self) -> Result<AuthSession> {
        let resp: CpaAuthUrl = self.get(AUTH_URL_PATH, &[self.is_webui_param()]).await?;

        let (Some(auth_url), Some(state)) = (resp.url, resp.state) else {
            return Err(self.parse_error("response missing url or state field"));
        };

        log::info!("[cpa] Auth URL generated (state: {})", preview_token(&state));
        Ok(AuthSession {
            auth_url,
            handle: state,
        })
    }

    async fn complete_authorization(&self, completion: &AuthCompletion) -> Result<BackendAccount> {
        self.submit_callback(&completion.callback.full_url).await?;

        let max_wait = self.poll_interval.as_secs() * u64::from(self.poll_max_retries);
        log::info!("[cpa] Waiting for authorization (up to {max_wait}s)...");

        let state = completion.session.handle.clone();
        poll_until_ok("cpa", self.poll_interval, self.poll_max_retries, || {
            let state = state.clone();
            async move { self.check_auth_status(&state).await }
        })
        .await?;

        // Pool insertion is handled server-side; echo the account identity back
        Ok(BackendAccount {
            id: None,
            name: completion.name.clone(),
            credential_email: Some(completion.name.clone()),
            priority: None,
            concurrency: None,
            group_ids: vec![],
        })
    }

    /// CPA exposes no account-listing endpoint; the existence discipline is
    /// best-effort and degrades to "unknown, assume absent" here.
    async fn list_accounts(&self) -> Result<Vec<BackendAccount>> {
        log::debug!("[cpa] No account listing endpoint; existence check skipped");
        Ok(vec![])
    }

    async fn add_account(&self, _email: &str, _tokens: &TokenBundle) -> Result<BackendAccount> {
        Err(BackendError::Unsupported {
            backend: "cpa".to_string(),
            operation: "add_account".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn poll_terminates_after_exact_budget() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result = poll_until_ok("cpa", Duration::from_millis(10), 3, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(PollStatus::Pending("pending".to_string()))
            }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(BackendError::AuthorizationTimeout { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn poll_succeeds_on_ok() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result = poll_until_ok("cpa", Duration::from_millis(1), 5, move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n >= 2 {
                    Ok(PollStatus::Ok)
                } else {
                    Ok(PollStatus::Pending("pending".to_string()))
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn poll_stops_early_on_rejection() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result = poll_until_ok("cpa", Duration::from_millis(1), 10, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(PollStatus::Rejected("failed".to_string()))
            }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(BackendError::AuthorizationRejected { status, .. }) if status == "failed"
        ));
    }

    #[tokio::test]
    async fn poll_propagates_check_errors() {
        let result = poll_until_ok("cpa", Duration::from_millis(1), 5, || async {
            Err(BackendError::NetworkError {
                backend: "cpa".to_string(),
                detail: "down".to_string(),
            })
        })
        .await;

        assert!(matches!(result, Err(BackendError::NetworkError { .. })));
    }
}
