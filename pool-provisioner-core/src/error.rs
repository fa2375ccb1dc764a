//! Unified error type definition

use thiserror::Error;

// Re-export library error type
pub use pool_provisioner_backend::BackendError;

use crate::services::AuthStage;

/// Core layer error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration file problem (unreadable, unparsable)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File store problem (tracker, team store, blacklist, CSV)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Team record could not be normalized
    #[error("Team store error: {0}")]
    TeamStore(String),

    /// The URL handed back is not an authorization callback
    #[error("Not an authorization callback: {0}")]
    InvalidCallback(String),

    /// An authorization attempt failed, with the stage it failed at
    #[error("Authorization failed at {stage}: {source}")]
    AuthorizationFailed {
        stage: AuthStage,
        #[source]
        source: Box<CoreError>,
    },

    /// An external collaborator (browser driver, email provisioner) failed
    #[error("External step failed: {0}")]
    External(String),

    /// The run was cancelled cooperatively
    #[error("Cancelled")]
    Cancelled,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend error (converted from the library)
    #[error("{0}")]
    Backend(#[from] BackendError),
}

impl CoreError {
    /// Whether this is expected behavior (operator-fixable input, explicit
    /// cancellation), used for log leveling.
    ///
    /// Level `warn` should be used when returning `true`, `error` otherwise.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Config(_) | Self::InvalidCallback(_) | Self::Cancelled => true,
            Self::Backend(e) => e.is_expected(),
            Self::AuthorizationFailed { source, .. } => source.is_expected(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
