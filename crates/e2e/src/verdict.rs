use tracing::warn;

use guestcheck_core::planner::DataSource;
use guestcheck_core::{GUESTS_TABLE, Guest};

use crate::client::TestContext;
use crate::queries;

/// Classify where the table planner's guest list comes from by running its
/// load query once more.
pub async fn data_source(ctx: &TestContext) -> DataSource {
    let rest = match ctx.rest() {
        Ok(rest) => rest,
        Err(e) => {
            warn!("{e:#}");
            return DataSource::Unavailable;
        }
    };
    match rest
        .select::<Guest>(GUESTS_TABLE, &queries::planner_guests())
        .await
    {
        Ok(guests) => DataSource::from_confirmed_count(guests.len()),
        Err(e) => {
            warn!("planner query failed: {e:#}");
            DataSource::Unavailable
        }
    }
}
