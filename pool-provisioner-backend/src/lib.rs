//! # pool-provisioner-backend
//!
//! A unified abstraction over heterogeneous account-pool backends: admin
//! services that store OAuth-authorized accounts for later consumption.
//!
//! ## Supported Backends
//!
//! | Backend | Feature Flag | Auth Method | Completion Protocol |
//! |---------|-------------|-------------|---------------------|
//! | CRS | `crs` | Bearer admin token | code exchange + add account |
//! | CPA | `cpa` | Bearer admin password | callback submit + status poll |
//! | S2A | `s2a` | `x-api-key` / Bearer JWT | combined create-from-oauth |
//! | Sub2API | `sub2api` | `x-api-key` / Bearer JWT | combined create-from-oauth |
//!
//! ## Feature Flags
//!
//! ### Backend Selection
//!
//! - **`all-backends`** *(default)* — Enable all backends listed above.
//! - **`crs`** / **`cpa`** / **`s2a`** / **`sub2api`** — Enable one backend.
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pool_provisioner_backend::{
//!     BackendCredentials, PoolBackend, TransportOptions, create_backend,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create a backend from credentials
//!     let credentials = BackendCredentials::Crs {
//!         api_base: "https://crs.example.com".to_string(),
//!         admin_token: "your-token".to_string(),
//!     };
//!     let backend = create_backend(credentials, &TransportOptions::default())?;
//!
//!     // 2. Verify connectivity and credentials against the remote API
//!     let summary = backend.verify_connection().await?;
//!     println!("{summary}");
//!
//!     // 3. Start an authorization attempt
//!     let session = backend.generate_auth_url().await?;
//!     println!("Visit: {}", session.auth_url);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All backend operations return [`Result<T, BackendError>`](BackendError).
//! The error enum provides structured variants for common failure modes:
//!
//! - [`BackendError::MissingConfig`] — required configuration absent (fail fast)
//! - [`BackendError::InvalidCredentials`] — admin credential rejected
//! - [`BackendError::AuthorizationTimeout`] — polling budget exhausted
//! - [`BackendError::NetworkError`] — network connectivity issue (retryable)
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are
//! automatically retried with exponential backoff. See [`BackendError`] for
//! the full list.

mod backends;
mod callback;
mod error;
mod factory;
mod http_client;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{BackendError, Result};

// Re-export factory functions
pub use factory::create_backend;

// Re-export core trait only (internal traits are not exported)
pub use traits::PoolBackend;

// Re-export types
pub use backends::TransportOptions;
pub use callback::{
    CALLBACK_HOST, CALLBACK_PATH, CallbackInfo, extract_code_from_url, is_auth_callback_url,
};
pub use http_client::{DEFAULT_MAX_RETRIES, ProxyPool, ProxyStrategy};
pub use types::{
    AuthCompletion, AuthProtocol, AuthSession, BackendAccount, BackendCredentials, BackendType,
    TokenBundle,
};

// Re-export concrete backends (behind feature flags)
#[cfg(feature = "crs")]
pub use backends::{CrsBackend, OwnerImport};

#[cfg(feature = "cpa")]
pub use backends::CpaBackend;

#[cfg(feature = "s2a")]
pub use backends::S2aBackend;

#[cfg(feature = "sub2api")]
pub use backends::Sub2apiBackend;
