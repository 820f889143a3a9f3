use anyhow::Result;
use serde::Serialize;

use guestcheck_core::status::StatusCheck;

use crate::parse_response;

/// HTTP client for the REST backend mounted under `/api`.
///
/// Typed reads where only the payload matters, raw methods returning the
/// `reqwest::Response` for specs that inspect status codes and headers.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create from an existing `reqwest::Client` (e.g. shared across suites).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full API URL from a path like `/status`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // ── Endpoints ─────────────────────────────────────────────────────────

    pub async fn list_status_checks(&self) -> Result<Vec<StatusCheck>> {
        let resp = self.client.get(self.url("/status")).send().await?;
        parse_response(resp).await
    }

    // ── Raw helpers ───────────────────────────────────────────────────────

    /// GET returning the raw response.
    pub async fn get_raw(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// POST with JSON body returning the raw response.
    pub async fn post_json_raw<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// CORS preflight for `path` as a browser on `origin` would send it.
    pub async fn preflight(&self, path: &str, origin: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .request(reqwest::Method::OPTIONS, self.url(path))
            .header(reqwest::header::ORIGIN, origin)
            .header(reqwest::header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .send()
            .await?)
    }
}
