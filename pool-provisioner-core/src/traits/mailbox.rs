//! Email-provisioning seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CoreResult;

/// Opaque handle to a provisioned mailbox, used for inbox polling.
#[derive(Debug, Clone)]
pub struct MailboxHandle(pub String);

/// A freshly provisioned address plus its mailbox handle.
#[derive(Debug, Clone)]
pub struct ProvisionedMailbox {
    pub address: String,
    pub handle: MailboxHandle,
}

/// Provider of throwaway inboxes for seat registration.
#[async_trait]
pub trait EmailProvisioner: Send + Sync {
    /// Create a fresh address.
    async fn create_email(&self) -> CoreResult<ProvisionedMailbox>;

    /// Poll the inbox for a verification code until `timeout` elapses.
    ///
    /// `Ok(None)` means the timeout passed without a code; not an error.
    async fn poll_code(
        &self,
        mailbox: &MailboxHandle,
        timeout: Duration,
    ) -> CoreResult<Option<String>>;
}
