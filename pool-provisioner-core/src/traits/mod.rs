//! Abstract traits for the external collaborators.
//!
//! Browser automation and email provisioning are mechanical I/O owned by
//! other components; the pipeline only depends on these seams.

mod browser;
mod mailbox;

pub use browser::{AuthorizationHandoff, BrowserDriver};
pub use mailbox::{EmailProvisioner, MailboxHandle, ProvisionedMailbox};
