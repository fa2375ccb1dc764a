use serde::{Deserialize, Serialize};

/// Unified error type for all pool-backend operations.
///
/// Each variant includes a `backend` field identifying which backend produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum BackendError {
    /// A network-level error occurred (DNS resolution failure, connection refused,
    /// upstream 5xx).
    ///
    /// This is a transient error and is automatically retried.
    NetworkError {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    ///
    /// This is a transient error and is automatically retried.
    Timeout {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    ///
    /// This is a transient error; the request should succeed after waiting.
    RateLimited {
        /// Backend that produced the error.
        backend: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the backend API, if available.
        raw_message: Option<String>,
    },

    /// A required configuration value is absent (base URL, admin credential).
    ///
    /// Surfaced by `verify_connection` before any network traffic so the
    /// pipeline fails fast with an actionable diagnosis.
    MissingConfig {
        /// Backend that produced the error.
        backend: String,
        /// Name of the missing configuration field.
        field: String,
    },

    /// The admin credential was rejected (HTTP 401).
    InvalidCredentials {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the backend API, if available.
        raw_message: Option<String>,
    },

    /// The authenticated principal lacks permission (HTTP 403).
    PermissionDenied {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the backend API, if available.
        raw_message: Option<String>,
    },

    /// The backend accepted the request but reported a business-level failure
    /// (`success: false` / `code != 0`). Not retried.
    ApiError {
        /// Backend that produced the error.
        backend: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },

    /// Failed to parse the backend's API response.
    ///
    /// Retrying an unexpected response shape rarely self-heals, so this is a
    /// single-attempt failure.
    ParseError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The authorization-status polling budget was exhausted.
    ///
    /// Distinct from [`AuthorizationRejected`](Self::AuthorizationRejected) so
    /// callers can decide whether to extend the wait.
    AuthorizationTimeout {
        /// Backend that produced the error.
        backend: String,
        /// Number of poll attempts made.
        attempts: u32,
        /// Total seconds waited.
        waited_secs: u64,
    },

    /// The authorization-status endpoint reported a terminal non-ok status.
    AuthorizationRejected {
        /// Backend that produced the error.
        backend: String,
        /// The terminal status reported by the backend.
        status: String,
    },

    /// The operation is not available on this backend variant.
    Unsupported {
        /// Backend that produced the error.
        backend: String,
        /// Name of the unsupported operation.
        operation: String,
    },

    /// An unrecognized error from the backend API.
    ///
    /// This is a catch-all for responses not yet mapped to a specific variant.
    Unknown {
        /// Backend that produced the error.
        backend: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl BackendError {
    /// Whether this is expected behavior (operator-fixable configuration or
    /// credential problems, explicit rejections), used for log leveling.
    ///
    /// `true` should log at `warn`, `false` at `error`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::MissingConfig { .. }
                | Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::AuthorizationRejected { .. }
                | Self::Unsupported { .. }
        )
    }

    /// Whether the transport layer may retry the request that produced this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { backend, detail } => {
                write!(f, "[{backend}] Network error: {detail}")
            }
            Self::Timeout { backend, detail } => {
                write!(f, "[{backend}] Request timeout: {detail}")
            }
            Self::RateLimited {
                backend,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{backend}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{backend}] Rate limited")
                }
            }
            Self::MissingConfig { backend, field } => {
                write!(f, "[{backend}] Missing configuration: {field}")
            }
            Self::InvalidCredentials {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{backend}] Invalid credentials")
                }
            }
            Self::PermissionDenied {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Permission denied: {msg}")
                } else {
                    write!(f, "[{backend}] Permission denied")
                }
            }
            Self::ApiError {
                backend,
                raw_code,
                raw_message,
            } => {
                if let Some(code) = raw_code {
                    write!(f, "[{backend}] API error {code}: {raw_message}")
                } else {
                    write!(f, "[{backend}] API error: {raw_message}")
                }
            }
            Self::ParseError { backend, detail } => {
                write!(f, "[{backend}] Parse error: {detail}")
            }
            Self::SerializationError { backend, detail } => {
                write!(f, "[{backend}] Serialization error: {detail}")
            }
            Self::AuthorizationTimeout {
                backend,
                attempts,
                waited_secs,
            } => {
                write!(
                    f,
                    "[{backend}] Authorization polling timed out after {attempts} attempts ({waited_secs}s)"
                )
            }
            Self::AuthorizationRejected { backend, status } => {
                write!(f, "[{backend}] Authorization rejected (status: {status})")
            }
            Self::Unsupported { backend, operation } => {
                write!(f, "[{backend}] Unsupported operation: {operation}")
            }
            Self::Unknown {
                backend,
                raw_message,
                ..
            } => {
                write!(f, "[{backend}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Convenience type alias for `Result<T, BackendError>`.
pub type Result<T> = std::result::Result<T, BackendError>;
