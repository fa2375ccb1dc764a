//! Shared adapter utilities.

use std::time::Duration;

use reqwest::{Client, Proxy};

// ============ HTTP Client ============

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default User-Agent presented to the backend admin APIs.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/135.0.0.0";

/// Transport configuration shared by every adapter's HTTP client.
///
/// Built once from the application configuration and passed to the factory;
/// a fixed request timeout on every outbound call keeps a single hung
/// request from stalling the pipeline indefinitely.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection-establishment timeout in seconds.
    pub connect_timeout_secs: u64,
    /// User-Agent header value.
    pub user_agent: String,
    /// Upstream proxy URL for all calls through this client, if any.
    pub proxy_url: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy_url: None,
        }
    }
}

/// Create an HTTP client from transport options.
///
/// An unparsable proxy URL is dropped with a warning rather than aborting;
/// a client without the proxy is still usable.
pub fn create_http_client(options: &TransportOptions) -> Client {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
        .timeout(Duration::from_secs(options.timeout_secs))
        .user_agent(options.user_agent.clone());

    if let Some(proxy_url) = &options.proxy_url {
        match Proxy::all(proxy_url) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(e) => log::warn!("Ignoring invalid proxy URL {proxy_url}: {e}"),
        }
    }

    builder.build().unwrap_or_else(|e| {
        log::warn!("Falling back to default HTTP client: {e}");
        Client::new()
    })
}

// ============ Base URL handling ============

/// Strip whitespace and any trailing `/` from a configured base URL.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://api.example.com/"),
            "https://api.example.com"
        );
    }

    #[test]
    fn normalize_strips_whitespace() {
        assert_eq!(
            normalize_base_url("  https://api.example.com  "),
            "https://api.example.com"
        );
    }

    #[test]
    fn normalize_leaves_clean_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com"),
            "https://api.example.com"
        );
    }

    #[test]
    fn default_transport_options() {
        let opts = TransportOptions::default();
        assert_eq!(opts.timeout_secs, 30);
        assert_eq!(opts.connect_timeout_secs, 10);
        assert!(opts.proxy_url.is_none());
    }
}
