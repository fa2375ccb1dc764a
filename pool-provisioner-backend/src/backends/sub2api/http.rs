//! Sub2API HTTP request methods.

use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::{DEFAULT_MAX_RETRIES, HttpUtils};
use crate::traits::BackendErrorMapper;

use super::Sub2apiBackend;
use super::types::unwrap_data;

impl BackendErrorMapper for Sub2apiBackend {
    fn backend_name(&self) -> &'static str {
        "sub2api"
    }
}

impl Sub2apiBackend {
    /// Admin middleware accepts either `x-api-key` or a Bearer JWT;
    /// `origin`/`referer` mirror the admin console.
    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        let mut builder = builder
            .header("accept", "*/*")
            .header("content-type", "application/json");

        if !self.admin_api_key.is_empty() {
            builder = builder.header("x-api-key", &self.admin_api_key);
        } else if !self.admin_jwt.is_empty() {
            builder = builder.header("authorization", format!("Bearer {}", self.admin_jwt));
        }

        if !self.api_base.is_empty() {
            builder = builder
                .header("origin", &self.api_base)
                .header("referer", format!("{}/", self.api_base));
        }

        builder
    }

    /// Execute a GET, returning the raw (once-unwrapped) payload.
    pub(crate) async fn get_value(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        if self.api_base.is_empty() {
            return Err(self.missing_config("api_base"));
        }
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

        if status != 200 {
            return Err(self.map_status(status, &body));
        }
        let raw: Value = HttpUtils::parse_json(&body, self.backend_name())?;
        Ok(unwrap_data(raw))
    }

    /// Execute a POST, returning the raw (once-unwrapped) payload.
    pub(crate) async fn post_value<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        if self.api_base.is_empty() {
            return Err(self.missing_config("api_base"));
        }
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

        if status != 200 {
            return Err(self.map_status(status, &text));
        }
        let raw: Value = HttpUtils::parse_json(&text, self.backend_name())?;
        Ok(unwrap_data(raw))
    }
}
