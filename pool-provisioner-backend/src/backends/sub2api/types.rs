//! Sub2API wire types.
//!
//! The service wraps payloads as `{"data": ...}` (sometimes `{"success":
//! true, "data": ...}` or `{"code": 0, "data": ...}`), and list responses may
//! nest a second `data` level next to pagination info. Unwrapping is done on
//! raw `serde_json::Value` before typed parsing to stay tolerant of the
//! variations.

use serde::Deserialize;
use serde_json::Value;

/// Peel the common response wrapper: prefer `data` when present, otherwise
/// return the payload as-is.
pub(crate) fn unwrap_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Extract list items from an unwrapped payload: either a bare array or a
/// `{data: [...], pagination: {...}}` wrapper.
pub(crate) fn extract_items(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => vec![],
        },
        _ => vec![],
    }
}

/// `generate-auth-url` response data; both naming conventions accepted.
#[derive(Debug, Deserialize)]
pub struct Sub2apiAuthUrlData {
    #[serde(default, alias = "authUrl")]
    pub auth_url: Option<String>,
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
}

/// An account as reported by the account listing or creation endpoints.
#[derive(Debug, Deserialize)]
pub struct Sub2apiAccount {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credentials: Option<Sub2apiCredentials>,
    #[serde(default)]
    pub extra: Option<Sub2apiExtra>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub concurrency: Option<u32>,
    #[serde(default)]
    pub group_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Sub2apiCredentials {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Sub2apiExtra {
    #[serde(default)]
    pub email: Option<String>,
}

impl Sub2apiAccount {
    /// Email match across name, credential email and extra email, trimmed
    /// and case-insensitive, mirroring the service's own lookup semantics.
    pub fn matches_email(&self, email: &str) -> bool {
        let needle = email.trim().to_lowercase();
        if self.name.trim().to_lowercase() == needle {
            return true;
        }
        if let Some(creds) = &self.credentials
            && creds
                .email
                .as_deref()
                .is_some_and(|e| e.trim().to_lowercase() == needle)
        {
            return true;
        }
        self.extra
            .as_ref()
            .and_then(|e| e.email.as_deref())
            .is_some_and(|e| e.trim().to_lowercase() == needle)
    }
}
