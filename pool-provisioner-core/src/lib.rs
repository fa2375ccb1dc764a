//! Pool Provisioner Core Library
//!
//! Business logic for provisioning OAuth-authorized accounts into pluggable
//! account-pool backends:
//! - Configuration loading (`config`)
//! - Team credential normalization (`TeamStore`)
//! - The durable account-lifecycle tracker (`AccountTracker`)
//! - Authorization orchestration (`AuthorizationOrchestrator`)
//! - The sequential pipeline driver (`PipelineDriver`)
//!
//! Browser automation and email provisioning are external collaborators,
//! abstracted behind the traits in [`traits`].

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use error::{CoreError, CoreResult};
pub use services::{
    AccountTracker, AuthOutcome, AuthStage, AuthorizationOrchestrator, CancelFlag, PipelineDriver,
    TeamStore,
};
pub use traits::{AuthorizationHandoff, BrowserDriver, EmailProvisioner};
