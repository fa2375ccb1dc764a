//! CRS API wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CRS generic response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct CrsResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// `generate-auth-url` response data.
#[derive(Debug, Deserialize)]
pub struct CrsAuthUrlData {
    #[serde(rename = "authUrl")]
    pub auth_url: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// `exchange-code` response data: the token bundle plus upstream account info.
#[derive(Debug, Deserialize)]
pub struct CrsCodexData {
    #[serde(default)]
    pub tokens: CrsTokens,
    #[serde(rename = "accountInfo", default)]
    pub account_info: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct CrsTokens {
    #[serde(rename = "idToken", default)]
    pub id_token: Option<String>,
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A pool account as reported by the list endpoint.
#[derive(Debug, Deserialize)]
pub struct CrsAccount {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: Option<u32>,
}

/// `add account` request body.
///
/// Field names are a protocol contract with the CRS admin API; do not rename.
#[derive(Debug, Serialize)]
pub struct CrsAddAccountBody {
    pub name: String,
    pub description: String,
    #[serde(rename = "accountType")]
    pub account_type: String,
    pub proxy: Option<Value>,
    #[serde(rename = "openaiOauth")]
    pub openai_oauth: CrsOauthPayload,
    #[serde(rename = "accountInfo")]
    pub account_info: Value,
    pub priority: u32,
}

#[derive(Debug, Serialize)]
pub struct CrsOauthPayload {
    #[serde(rename = "idToken")]
    pub id_token: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_auth_url_response() {
        let body = r#"{"success":true,"data":{"authUrl":"https://auth.example.com/x","sessionId":"sess-123"}}"#;
        let resp: CrsResponse<CrsAuthUrlData> = serde_json::from_str(body).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data.auth_url, "https://auth.example.com/x");
        assert_eq!(data.session_id, "sess-123");
    }

    #[test]
    fn parse_failure_envelope() {
        let body = r#"{"success":false,"message":"bad session"}"#;
        let resp: CrsResponse<CrsAuthUrlData> = serde_json::from_str(body).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("bad session"));
        assert!(resp.data.is_none());
    }

    #[test]
    fn parse_codex_data_with_missing_fields() {
        let body = r#"{"success":true,"data":{"tokens":{"accessToken":"at"}}}"#;
        let resp: CrsResponse<CrsCodexData> = serde_json::from_str(body).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.tokens.access_token.as_deref(), Some("at"));
        assert!(data.tokens.refresh_token.is_none());
        assert!(data.account_info.is_null());
    }

    #[test]
    fn add_account_body_field_names() {
        let body = CrsAddAccountBody {
            name: "a@b.com".into(),
            description: String::new(),
            account_type: "shared".into(),
            proxy: None,
            openai_oauth: CrsOauthPayload {
                id_token: "id".into(),
                access_token: "at".into(),
                refresh_token: "rt".into(),
                expires_in: 864_000,
            },
            account_info: serde_json::json!({}),
            priority: 50,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"accountType\":\"shared\""));
        assert!(json.contains("\"openaiOauth\""));
        assert!(json.contains("\"idToken\":\"id\""));
        assert!(json.contains("\"accessToken\":\"at\""));
        assert!(json.contains("\"refreshToken\":\"rt\""));
        assert!(json.contains("\"accountInfo\""));
        assert!(json.contains("\"proxy\":null"));
    }
}
