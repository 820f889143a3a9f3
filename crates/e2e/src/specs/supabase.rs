use anyhow::{Context, Result, bail, ensure};
use tracing::{info, warn};

use guestcheck_client::RowQuery;
use guestcheck_core::planner::{MappingQuality, map_guests};
use guestcheck_core::report::{DataQuality, distinct_user_ids};
use guestcheck_core::{EXPECTED_GUEST_COLUMNS, GUESTS_TABLE, Guest, UserScope};

use crate::client::TestContext;
use crate::queries;

/// Authenticated GET /rest/v1/ succeeds.
pub async fn connection(ctx: &TestContext) -> Result<()> {
    let resp = ctx.rest()?.root().await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    Ok(())
}

/// The guest table is readable. Columns missing from a sample row are
/// reported but do not fail the spec.
pub async fn guest_table_structure(ctx: &TestContext) -> Result<()> {
    let resp = ctx
        .rest()?
        .select_raw(GUESTS_TABLE, &RowQuery::new().limit(1))
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let body: serde_json::Value = resp.json().await?;
    let rows = body.as_array().context("guest table response must be an array")?;
    let Some(sample) = rows.first() else {
        info!("guest table is empty; column check skipped");
        return Ok(());
    };

    let missing: Vec<&str> = EXPECTED_GUEST_COLUMNS
        .iter()
        .copied()
        .filter(|col| sample.get(col).is_none())
        .collect();
    if missing.is_empty() {
        info!("guest table exposes every expected column");
    } else {
        warn!(?missing, "guest table sample lacks expected columns");
    }
    Ok(())
}

/// `confermato=eq.true` only returns confirmed rows.
pub async fn confirmed_guests_query(ctx: &TestContext) -> Result<()> {
    let resp = ctx
        .rest()?
        .select_raw(GUESTS_TABLE, &queries::confirmed_guests())
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let guests: Vec<Guest> = resp.json().await.context("decode confirmed guests")?;
    if let Some(bad) = guests.iter().find(|g| g.confermato != Some(true)) {
        bail!(
            "guest {} returned by the confirmed filter has confermato = {:?}",
            bad.id,
            bad.confermato
        );
    }

    let quality = DataQuality::of(&guests);
    info!(
        total = quality.total,
        with_name = quality.with_name,
        with_group = quality.with_group,
        "confirmed guests"
    );
    Ok(())
}

/// Counts the distinct owners visible to the anon key. More than one suggests
/// row-level security is off.
pub async fn user_isolation(ctx: &TestContext) -> Result<()> {
    let resp = ctx
        .rest()?
        .select_raw(GUESTS_TABLE, &RowQuery::new().select(&["user_id"]))
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let rows: Vec<UserScope> = resp.json().await.context("decode guest owners")?;
    let users = distinct_user_ids(&rows);
    if users.len() > 1 {
        warn!(
            users = users.len(),
            "guests of several users are visible; row-level security may be disabled"
        );
    } else {
        info!(users = users.len(), rows = rows.len(), "guest rows are scoped");
    }
    Ok(())
}

/// Confirmed guests map onto the planner's `TableGuest` shape.
pub async fn table_guest_mapping(ctx: &TestContext) -> Result<()> {
    let guests = ctx.confirmed_guests().await?;
    ensure!(!guests.is_empty(), "no confirmed guests to map");

    let mapped = map_guests(&guests);
    ensure!(
        mapped.iter().all(|g| !g.id.is_empty() && g.confermato),
        "mapped guests must carry an id and be confirmed"
    );

    let quality = MappingQuality::of(&mapped);
    info!(
        total = quality.total,
        named = quality.named,
        categorized = quality.categorized,
        "mapped confirmed guests"
    );
    if quality.named < quality.total {
        warn!(
            unnamed = quality.total - quality.named,
            "some confirmed guests have no display name"
        );
    }
    Ok(())
}

/// Reads without credentials should be rejected. A public table passes with a
/// warning.
pub async fn authentication_requirement(ctx: &TestContext) -> Result<()> {
    let resp = ctx
        .rest()?
        .select_unauthenticated(GUESTS_TABLE, &RowQuery::new().limit(1))
        .await?;
    match resp.status().as_u16() {
        401 => Ok(()),
        200 => {
            warn!("guest table is readable without credentials");
            Ok(())
        }
        other => bail!("expected 401 or 200 without credentials, got {other}"),
    }
}
