//! CRS HTTP request methods.

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::{DEFAULT_MAX_RETRIES, HttpUtils};
use crate::traits::BackendErrorMapper;

use super::{CrsBackend, CrsResponse};

impl CrsBackend {
    /// Apply the CRS admin headers to a request.
    ///
    /// `origin`/`referer` mirror the admin console the API expects traffic
    /// from; the admin token rides in the `Authorization` header.
    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("accept", "*/*")
            .header("authorization", format!("Bearer {}", self.admin_token))
            .header("content-type", "application/json")
            .header("origin", &self.api_base)
            .header("referer", format!("{}/admin-next/accounts", self.api_base))
    }

    /// Execute a GET against a CRS admin path and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.with_headers(self.client.get(&url));

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

    /// Execute a POST against a CRS admin path and unwrap the envelope.
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

    /// Map non-200 statuses, parse the `{success, message, data}` envelope,
    /// and surface `success: false` as an API error.
    fn unwrap_envelope<T: DeserializeOwned>(&self, status: u16, body: &str) -> Result<T> {
        if status != 200 {
            return Err(self.map_status(status, body));
        }

        let envelope: CrsResponse<T> = HttpUtils::parse_json(body, self.backend_name())?;
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            log::error!("[crs] API error: {message}");
            return Err(self.api_error(None, message));
        }

        envelope
            .data
            .ok_or_else(|| self.parse_error("missing data field in response"))
    }
}
