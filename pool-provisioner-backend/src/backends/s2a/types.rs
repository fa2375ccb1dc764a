//! S2A API wire types.

use serde::{Deserialize, Serialize};

/// S2A generic response envelope: `code == 0` is success.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct S2aResponse<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Paginated list payload: `{ items: [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum S2aListData<T> {
    Paged { items: Vec<T> },
    Bare(Vec<T>),
}

impl<T> S2aListData<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paged { items } => items,
            Self::Bare(items) => items,
        }
    }
}

/// A group as reported by the group listing.
#[derive(Debug, Deserialize)]
pub struct S2aGroup {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

/// `generate-auth-url` response data.
#[derive(Debug, Deserialize)]
pub struct S2aAuthUrlData {
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// An account as reported by the account listing or creation endpoints.
#[derive(Debug, Deserialize)]
pub struct S2aAccount {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credentials: Option<S2aAccountCredentials>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub concurrency: Option<u32>,
    #[serde(default)]
    pub group_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct S2aAccountCredentials {
    #[serde(default)]
    pub email: Option<String>,
}

/// Two-step `add account` request body.
///
/// Field names are a protocol contract with the S2A admin API; do not rename.
#[derive(Debug, Serialize)]
pub struct S2aAddAccountBody {
    pub name: String,
    pub platform: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub credentials: S2aCredentialsPayload,
    pub concurrency: u32,
    pub priority: u32,
    pub auto_pause_on_expired: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct S2aCredentialsPayload {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_success_envelope() {
        let body = r#"{"code":0,"data":{"auth_url":"https://a","session_id":"s"}}"#;
        let resp: S2aResponse<S2aAuthUrlData> = serde_json::from_str(body).unwrap();
        assert_eq!(resp.code, 0);
        let data = resp.data.unwrap();
        assert_eq!(data.auth_url.as_deref(), Some("https://a"));
        assert_eq!(data.session_id.as_deref(), Some("s"));
    }

    #[test]
    fn parse_failure_envelope() {
        let body = r#"{"code":1001,"message":"invalid session"}"#;
        let resp: S2aResponse<S2aAuthUrlData> = serde_json::from_str(body).unwrap();
        assert_eq!(resp.code, 1001);
        assert_eq!(resp.message.as_deref(), Some("invalid session"));
    }

    #[test]
    fn list_data_paged() {
        let body = r#"{"items":[{"name":"a@b.com"}]}"#;
        let data: S2aListData<S2aAccount> = serde_json::from_str(body).unwrap();
        let items = data.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "a@b.com");
    }

    #[test]
    fn list_data_bare_array() {
        let body = r#"[{"name":"a@b.com"},{"name":"c@d.com"}]"#;
        let data: S2aListData<S2aAccount> = serde_json::from_str(body).unwrap();
        assert_eq!(data.into_items().len(), 2);
    }

    #[test]
    fn account_with_credential_email() {
        let body = r#"{"name":"seat-1","credentials":{"email":"x@y.com"}}"#;
        let account: S2aAccount = serde_json::from_str(body).unwrap();
        assert_eq!(
            account.credentials.and_then(|c| c.email).as_deref(),
            Some("x@y.com")
        );
    }

    #[test]
    fn add_account_body_omits_empty_optionals() {
        let body = S2aAddAccountBody {
            name: "a@b.com".into(),
            platform: "openai".into(),
            account_type: "oauth".into(),
            credentials: S2aCredentialsPayload {
                access_token: "at".into(),
                refresh_token: "rt".into(),
                expires_at: None,
                id_token: None,
                email: None,
            },
            concurrency: 10,
            priority: 50,
            auto_pause_on_expired: true,
            group_ids: vec![],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"type\":\"oauth\""));
        assert!(json.contains("\"auto_pause_on_expired\":true"));
        assert!(!json.contains("expires_at"));
        assert!(!json.contains("id_token"));
        assert!(!json.contains("group_ids"));
    }
}
