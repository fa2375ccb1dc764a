//! Shared test utilities and helpers.

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use pool_provisioner_backend::{
    BackendCredentials, PoolBackend, TransportOptions, create_backend,
};

/// Skip a test when the required environment variables are absent.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert a `Result` is `Ok` and unwrap it (failing the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Generate a unique test account email.
pub fn generate_test_email() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}@example.com", &uuid.to_string()[..8])
}

/// Test context — wraps a backend built from environment credentials.
pub struct TestContext {
    pub backend: Arc<dyn PoolBackend>,
}

impl TestContext {
    /// Create a CRS test context.
    pub fn crs() -> Option<Self> {
        let api_base = env::var("CRS_API_BASE").ok()?;
        let admin_token = env::var("CRS_ADMIN_TOKEN").ok()?;

        let credentials = BackendCredentials::Crs {
            api_base,
            admin_token,
        };
        let backend = create_backend(credentials, &TransportOptions::default()).ok()?;

        Some(Self { backend })
    }

    /// Create a CPA test context.
    pub fn cpa() -> Option<Self> {
        let api_base = env::var("CPA_API_BASE").ok()?;
        let admin_password = env::var("CPA_ADMIN_PASSWORD").ok()?;

        let credentials = BackendCredentials::Cpa {
            api_base,
            admin_password,
            is_webui: true,
            poll_interval_secs: 3,
            poll_max_retries: 20,
        };
        let backend = create_backend(credentials, &TransportOptions::default()).ok()?;

        Some(Self { backend })
    }

    /// Create an S2A test context.
    pub fn s2a() -> Option<Self> {
        let api_base = env::var("S2A_API_BASE").ok()?;
        let admin_key = env::var("S2A_ADMIN_KEY").unwrap_or_default();
        let admin_token = env::var("S2A_ADMIN_TOKEN").unwrap_or_default();
        if admin_key.is_empty() && admin_token.is_empty() {
            return None;
        }

        let credentials = BackendCredentials::S2a {
            api_base,
            admin_key,
            admin_token,
            concurrency: 10,
            priority: 50,
            group_ids: vec![],
            group_names: vec![],
        };
        let backend = create_backend(credentials, &TransportOptions::default()).ok()?;

        Some(Self { backend })
    }

    /// Create a Sub2API test context.
    pub fn sub2api() -> Option<Self> {
        let api_base = env::var("SUB2API_API_BASE").ok()?;
        let admin_api_key = env::var("SUB2API_ADMIN_API_KEY").unwrap_or_default();
        let admin_jwt = env::var("SUB2API_ADMIN_JWT").unwrap_or_default();
        if admin_api_key.is_empty() && admin_jwt.is_empty() {
            return None;
        }

        let credentials = BackendCredentials::Sub2api {
            api_base,
            admin_api_key,
            admin_jwt,
            concurrency: 10,
            priority: 50,
            group_ids: vec![],
            proxy_id: None,
        };
        let backend = create_backend(credentials, &TransportOptions::default()).ok()?;

        Some(Self { backend })
    }
}
