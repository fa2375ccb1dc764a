//! S2A HTTP request methods.

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::{DEFAULT_MAX_RETRIES, HttpUtils};
use crate::traits::BackendErrorMapper;

use super::{S2aBackend, S2aResponse};

impl BackendErrorMapper for S2aBackend {
    fn backend_name(&self) -> &'static str {
        "s2a"
    }
}

impl S2aBackend {
    /// Admin API key (`x-api-key`) preferred; JWT Bearer fallback.
    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header("accept", "application/json")
            .header("content-type", "application/json");

        if !self.admin_key.is_empty() {
            builder.header("x-api-key", &self.admin_key)
        } else if !self.admin_token.is_empty() {
            builder.header("authorization", format!("Bearer {}", self.admin_token))
        } else {
            builder
        }
    }

    /// Execute a GET against an S2A admin path and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.with_headers(self.client.get(&url)).query(query);

        let (status, body) = HttpUtils::execute_request_with_retry(
            builder,
            self.backend_name(),
            "GET",
            path,
            DEFAULT_MAX_RETRIES,
        )
        .await?;

        self.unwrap_envelope(status, &body)
    }

    /// Execute a POST against an S2A admin path and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.with_headers(self.client.post(&url)).json(body);

        let (status, text) = HttpUtils::execute_request_with_retry(
            builder,
            self.backend_name(),
            "POST",
            path,
            DEFAULT_MAX_RETRIES,
        )
        .await?;

        self.unwrap_envelope(status, &text)
    }

    /// Map non-200 statuses, parse the `{code, message, data}` envelope, and
    /// surface `code != 0` as an API error.
    fn unwrap_envelope<T: DeserializeOwned>(&self, status: u16, body: &str) -> Result<T> {
        if status != 200 {
            return Err(self.map_status(status, body));
        }

        let envelope: S2aResponse<T> = HttpUtils::parse_json(body, self.backend_name())?;
        if envelope.code != 0 {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            log::error!("[s2a] API error (code {}): {message}", envelope.code);
            return Err(self.api_error(Some(envelope.code.to_string()), message));
        }

        envelope
            .data
            .ok_or_else(|| self.parse_error("missing data field in response"))
    }
}
