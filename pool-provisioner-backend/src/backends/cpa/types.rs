//! CPA API wire types.
//!
//! CPA responses are flat objects, no envelope.

use serde::Deserialize;

/// `codex-auth-url` response.
#[derive(Debug, Deserialize)]
pub struct CpaAuthUrl {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// `get-auth-status` response.
#[derive(Debug, Deserialize)]
pub struct CpaAuthStatus {
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_auth_url() {
        let body = r#"{"url":"https://auth.example.com/x","state":"st-1"}"#;
        let resp: CpaAuthUrl = serde_json::from_str(body).unwrap();
        assert_eq!(resp.url.as_deref(), Some("https://auth.example.com/x"));
        assert_eq!(resp.state.as_deref(), Some("st-1"));
    }

    #[test]
    fn parse_auth_url_missing_fields() {
        let resp: CpaAuthUrl = serde_json::from_str("{}").unwrap();
        assert!(resp.url.is_none());
        assert!(resp.state.is_none());
    }

    #[test]
    fn parse_auth_status() {
        let resp: CpaAuthStatus = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(resp.status, "ok");
    }

    #[test]
    fn parse_auth_status_missing() {
        let resp: CpaAuthStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.status, "");
    }
}
