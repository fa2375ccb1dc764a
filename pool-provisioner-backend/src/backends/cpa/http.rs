//! CPA HTTP request methods.

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::{DEFAULT_MAX_RETRIES, HttpUtils};
use crate::traits::BackendErrorMapper;

use super::CpaBackend;

impl BackendErrorMapper for CpaBackend {
    fn backend_name(&self) -> &'static str {
        "cpa"
    }
}

impl CpaBackend {
    /// CPA authenticates with the admin-panel password as a Bearer credential.
    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("accept", "application/json")
            .header("authorization", format!("Bearer {}", self.admin_password))
            .header("content-type", "application/json")
    }

    /// Execute a GET against a CPA management path.
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

        if status != 200 {
            return Err(self.map_status(status, &body));
        }
        HttpUtils::parse_json(&body, self.backend_name())
    }

    /// Execute a POST against a CPA management path, discarding the body.
    pub(crate) async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
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
        Ok(())
    }
}
