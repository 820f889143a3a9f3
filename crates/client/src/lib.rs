pub mod backend;
pub mod query;
pub mod rest;

pub use backend::BackendClient;
pub use guestcheck_core;
pub use query::RowQuery;
pub use rest::RestClient;

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and body text.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> anyhow::Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("{status}: {body}");
    }
    Ok(resp.json().await?)
}
