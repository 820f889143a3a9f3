use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::parse_response;
use crate::query::RowQuery;

/// Client for a PostgREST interface (`/rest/v1/<table>`), authenticated with
/// an anon API key sent both as `apikey` and as a bearer token.
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    /// Create from an existing `reqwest::Client` (e.g. shared across suites).
    pub fn with_client(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL under the project root, e.g. `/auth/v1/settings`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a table URL with an optional query string.
    pub fn table_url(&self, table: &str, query: &RowQuery) -> String {
        let base = format!("{}/rest/v1/{}", self.base_url, table);
        if query.is_empty() {
            base
        } else {
            format!("{base}?{}", query.to_query_string())
        }
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    // ── Raw helpers ───────────────────────────────────────────────────────

    /// Authenticated GET on the REST root (`/rest/v1/`).
    pub async fn root(&self) -> Result<reqwest::Response> {
        let req = self.client.get(self.url("/rest/v1/"));
        Ok(self.authed(req).send().await?)
    }

    /// Authenticated table read returning the raw response.
    pub async fn select_raw(&self, table: &str, query: &RowQuery) -> Result<reqwest::Response> {
        let url = self.table_url(table, query);
        debug!("GET {url}");
        Ok(self.authed(self.client.get(url)).send().await?)
    }

    /// Table read without any credentials, for probing access control.
    pub async fn select_unauthenticated(
        &self,
        table: &str,
        query: &RowQuery,
    ) -> Result<reqwest::Response> {
        Ok(self.client.get(self.table_url(table, query)).send().await?)
    }

    /// Authenticated insert asking for the created row back.
    pub async fn insert_raw<B: Serialize>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let url = self.table_url(table, &RowQuery::new());
        debug!("POST {url}");
        let req = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(body);
        Ok(self.authed(req).send().await?)
    }

    /// GET `/auth/v1/settings`, which only needs the `apikey` header.
    pub async fn auth_settings(&self) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.url("/auth/v1/settings"))
            .header("apikey", &self.api_key)
            .send()
            .await?)
    }

    // ── Typed helpers ─────────────────────────────────────────────────────

    /// Read and deserialize every row matching `query`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &RowQuery,
    ) -> Result<Vec<T>> {
        let resp = self.select_raw(table, query).await?;
        parse_response(resp)
            .await
            .with_context(|| format!("select from {table}"))
    }

    /// Insert one row and return the created representation.
    ///
    /// PostgREST answers `201 Created` with a one-element array; anything else
    /// is an error.
    pub async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.insert_raw(table, body).await?;
        let status = resp.status();
        if status != reqwest::StatusCode::CREATED {
            let text = resp.text().await.unwrap_or_default();
            bail!("insert into {table} failed ({status}): {text}");
        }
        let mut rows: Vec<T> = resp
            .json()
            .await
            .with_context(|| format!("decode rows created in {table}"))?;
        if rows.is_empty() {
            bail!("insert into {table} returned no rows");
        }
        Ok(rows.swap_remove(0))
    }
}
