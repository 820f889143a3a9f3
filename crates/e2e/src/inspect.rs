use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use guestcheck_client::RowQuery;
use guestcheck_core::report::{ConfirmationBreakdown, ConfirmationCounts, DataQuality};
use guestcheck_core::{GUESTS_TABLE, Guest, INVITATION_UNITS_TABLE, PROFILES_TABLE, Profile};

use crate::client::TestContext;

/// Row count of one table, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: Option<usize>,
    pub error: Option<String>,
}

/// Read-only snapshot of the guest data.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub counts: ConfirmationCounts,
    pub quality: DataQuality,
    pub sample: Vec<Guest>,
    pub unconfirmed: Vec<Guest>,
    pub unknown: Vec<Guest>,
    pub tables: Vec<TableCount>,
    pub sample_profile_user: Option<String>,
}

impl InspectionReport {
    pub fn total(&self) -> usize {
        self.counts.confirmed + self.counts.declined + self.counts.pending
    }

    /// Guests that are declined or undecided and could be flipped to
    /// confirmed for planner testing.
    pub fn has_confirmable(&self) -> bool {
        !self.unconfirmed.is_empty() || !self.unknown.is_empty()
    }
}

/// Fetch every guest, partition by confirmation and count the related tables.
///
/// Failing to read the guest table is an error; failures on the other tables
/// are recorded in the report.
pub async fn inspect_guests(ctx: &TestContext, sample: usize) -> Result<InspectionReport> {
    let rest = ctx.rest()?;
    let guests: Vec<Guest> = rest
        .select(GUESTS_TABLE, &RowQuery::new().select_all())
        .await
        .context("read guest table")?;
    info!(rows = guests.len(), "guest table read");

    let quality = DataQuality::of(&guests);
    let sample_rows = guests.iter().take(sample).cloned().collect();
    let breakdown = ConfirmationBreakdown::partition(guests);

    let mut tables = vec![TableCount {
        table: GUESTS_TABLE.to_string(),
        rows: Some(breakdown.total()),
        error: None,
    }];
    tables.push(count_rows(ctx, INVITATION_UNITS_TABLE).await);

    let profiles: Result<Vec<Profile>> = rest
        .select(PROFILES_TABLE, &RowQuery::new().select(&["user_id"]))
        .await;
    let sample_profile_user = match profiles {
        Ok(rows) => {
            tables.push(TableCount {
                table: PROFILES_TABLE.to_string(),
                rows: Some(rows.len()),
                error: None,
            });
            rows.into_iter().next().map(|p| p.user_id)
        }
        Err(e) => {
            warn!("could not read {PROFILES_TABLE}: {e:#}");
            tables.push(TableCount {
                table: PROFILES_TABLE.to_string(),
                rows: None,
                error: Some(format!("{e:#}")),
            });
            None
        }
    };

    Ok(InspectionReport {
        counts: breakdown.counts(),
        quality,
        sample: sample_rows,
        unconfirmed: breakdown.declined,
        unknown: breakdown.pending,
        tables,
        sample_profile_user,
    })
}

async fn count_rows(ctx: &TestContext, table: &str) -> TableCount {
    let rows: Result<Vec<serde_json::Value>> = match ctx.rest() {
        Ok(rest) => rest.select(table, &RowQuery::new().select(&["id"])).await,
        Err(e) => Err(e),
    };
    match rows {
        Ok(rows) => TableCount {
            table: table.to_string(),
            rows: Some(rows.len()),
            error: None,
        },
        Err(e) => {
            warn!("could not read {table}: {e:#}");
            TableCount {
                table: table.to_string(),
                rows: None,
                error: Some(format!("{e:#}")),
            }
        }
    }
}
