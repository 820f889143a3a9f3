use anyhow::{Context, Result, ensure};
use serde_json::json;
use tracing::{info, warn};

use guestcheck_core::status::{ROOT_GREETING, StatusCheck};

use crate::client::TestContext;
use crate::fixtures;

/// GET /api/ answers with exactly `{"message": "Hello World"}`.
pub async fn root_endpoint(ctx: &TestContext) -> Result<()> {
    let resp = ctx.backend()?.get_raw("/").await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let body: serde_json::Value = resp.json().await?;
    ensure!(
        body == json!({ "message": ROOT_GREETING }),
        "unexpected root body: {body}"
    );
    Ok(())
}

/// GET /api/status returns a JSON array.
pub async fn list_status_checks(ctx: &TestContext) -> Result<()> {
    let resp = ctx.backend()?.get_raw("/status").await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let body: serde_json::Value = resp.json().await?;
    let checks = body.as_array().context("status list must be an array")?;
    info!(count = checks.len(), "status checks listed");
    Ok(())
}

/// POST /api/status echoes the client name, then the new record shows up in
/// the listing.
pub async fn status_check_roundtrip(ctx: &TestContext) -> Result<()> {
    let backend = ctx.backend()?;
    let request = fixtures::status_check_request();

    let resp = backend.post_json_raw("/status", &request).await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    let created: StatusCheck = resp.json().await.context("decode created status check")?;
    ensure!(!created.id.is_empty(), "created status check has no id");
    ensure!(
        created.echoes(&request),
        "client_name mismatch: sent {:?}, got {:?}",
        request.client_name,
        created.client_name
    );
    ensure!(!created.timestamp.is_empty(), "created status check has no timestamp");

    let listed = backend.list_status_checks().await?;
    ensure!(
        listed.iter().any(|c| c.id == created.id),
        "status check {} missing from listing of {}",
        created.id,
        listed.len()
    );
    Ok(())
}

/// A CORS preflight against /api/ completes. A missing
/// `Access-Control-Allow-Origin` header is only reported.
pub async fn cors_configuration(ctx: &TestContext) -> Result<()> {
    let resp = ctx
        .backend()?
        .preflight("/", fixtures::DEFAULT_ORIGIN)
        .await
        .context("CORS preflight did not complete")?;

    match resp
        .headers()
        .get(reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN)
    {
        Some(origin) => info!(allow_origin = ?origin, status = %resp.status(), "CORS enabled"),
        None => warn!(
            status = %resp.status(),
            "backend sent no Access-Control-Allow-Origin header; browsers may block requests"
        ),
    }
    Ok(())
}
