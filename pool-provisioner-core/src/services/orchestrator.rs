//! Authorization orchestrator
//!
//! Drives one account through the full authorization protocol of the
//! selected backend:
//!
//! ```text
//! INIT -> URL_GENERATED -> {CODE_SUBMITTED | CALLBACK_SUBMITTED} -> POLLING -> AUTHORIZED | FAILED
//! ```
//!
//! The transition after `URL_GENERATED` is chosen statically from the
//! backend's protocol. Every failure carries the stage it happened at so the
//! driver can record the right resume point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pool_provisioner_backend::{
    AuthCompletion, AuthProtocol, BackendAccount, CallbackInfo, PoolBackend, is_auth_callback_url,
};

use crate::error::{CoreError, CoreResult};
use crate::traits::AuthorizationHandoff;

/// Stage of an authorization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStage {
    Init,
    UrlGenerated,
    CodeSubmitted,
    CallbackSubmitted,
    Polling,
    Authorized,
    Failed,
}

impl std::fmt::Display for AuthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::UrlGenerated => "url_generated",
            Self::CodeSubmitted => "code_submitted",
            Self::CallbackSubmitted => "callback_submitted",
            Self::Polling => "polling",
            Self::Authorized => "authorized",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a successful orchestration call.
#[derive(Debug)]
pub enum AuthOutcome {
    /// The account was authorized and inserted into the pool.
    Provisioned(BackendAccount),
    /// An account for this email already existed; no authorization traffic
    /// was generated.
    AlreadyPresent,
}

/// Orchestrates one authorization attempt per call.
pub struct AuthorizationOrchestrator {
    backend: Arc<dyn PoolBackend>,
}

impl AuthorizationOrchestrator {
    #[must_use]
    pub fn new(backend: Arc<dyn PoolBackend>) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn PoolBackend> {
        &self.backend
    }

    /// Drive one account through authorization.
    ///
    /// Failures are wrapped as [`CoreError::AuthorizationFailed`] with the
    /// stage reached. A `generate_auth_url` failure is terminal for this
    /// attempt: the remediation is a fresh attempt (a fresh URL), not a
    /// retry of the same request, and that loop belongs to the caller.
    pub async fn authorize(
        &self,
        email: &str,
        handoff: &dyn AuthorizationHandoff,
    ) -> CoreResult<AuthOutcome> {
        let mut stage = AuthStage::Init;

        // Skip accounts already present before generating any traffic for them
        if self.backend.account_exists(email).await.unwrap_or(false) {
            log::info!(
                "[{}] Account already in pool, skipping: {email}",
                self.backend.id()
            );
            return Ok(AuthOutcome::AlreadyPresent);
        }

        let session = self
            .backend
            .generate_auth_url()
            .await
            .map_err(|e| fail(stage, e.into()))?;
        stage = AuthStage::UrlGenerated;

        let callback_url = handoff
            .obtain_callback(&session.auth_url)
            .await
            .map_err(|e| fail(stage, e))?;

        if !is_auth_callback_url(&callback_url) {
            return Err(fail(stage, CoreError::InvalidCallback(callback_url)));
        }
        let callback = CallbackInfo::parse(&callback_url)
            .ok_or_else(|| fail(stage, CoreError::InvalidCallback(callback_url.clone())))?;

        stage = match self.backend.protocol() {
            AuthProtocol::CodeExchange | AuthProtocol::CombinedCreate => AuthStage::CodeSubmitted,
            AuthProtocol::CallbackPoll => AuthStage::CallbackSubmitted,
        };

        let completion = AuthCompletion {
            session,
            callback,
            name: email.to_string(),
        };

        // Pool insertion must succeed too: authorized upstream but absent
        // from the pool is a failure for tracker purposes.
        let account = self
            .backend
            .complete_authorization(&completion)
            .await
            .map_err(|e| {
                let failed_stage = if self.backend.protocol() == AuthProtocol::CallbackPoll {
                    AuthStage::Polling
                } else {
                    stage
                };
                fail(failed_stage, e.into())
            })?;

        log::info!("[{}] Authorization complete: {email}", self.backend.id());
        Ok(AuthOutcome::Provisioned(account))
    }
}

fn fail(stage: AuthStage, source: CoreError) -> CoreError {
    CoreError::AuthorizationFailed {
        stage,
        source: Box::new(source),
    }
}
