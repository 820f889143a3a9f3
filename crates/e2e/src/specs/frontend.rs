use anyhow::{Context, Result, ensure};
use tracing::info;

use guestcheck_core::planner::{DataSource, MappingQuality, map_guests};
use guestcheck_core::{GUESTS_TABLE, Guest};

use crate::client::TestContext;
use crate::queries;

/// The web application answers on its root URL.
pub async fn frontend_accessible(ctx: &TestContext) -> Result<()> {
    let url = ctx.frontend_url()?;
    let resp = ctx
        .http()
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    Ok(())
}

/// GET /auth/v1/settings, which the login page calls before sign-in.
pub async fn auth_settings_endpoint(ctx: &TestContext) -> Result<()> {
    let resp = ctx.rest()?.auth_settings().await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    Ok(())
}

/// The planner's own query succeeds and its rows map cleanly.
pub async fn table_planner_data_flow(ctx: &TestContext) -> Result<()> {
    let resp = ctx
        .rest()?
        .select_raw(GUESTS_TABLE, &queries::planner_guests())
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let guests: Vec<Guest> = resp.json().await.context("decode planner guests")?;
    let mapped = map_guests(&guests);
    let quality = MappingQuality::of(&mapped);
    let source = DataSource::from_confirmed_count(mapped.len());
    info!(
        total = quality.total,
        named = quality.named,
        categorized = quality.categorized,
        source = ?source,
        "{}",
        source.describe()
    );
    Ok(())
}
