//! Seeding of confirmed guests for the table planner.
//!
//! One invitation unit is created for the scope user, then every roster
//! entry is inserted as a confirmed guest pointing at it. Nothing is rolled
//! back: per-guest failures are collected in the report and the run carries
//! on. The only fatal condition is having no invitation unit to attach
//! guests to.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, warn};

use guestcheck_core::validate::{describe, validate_guest, validate_unit};
use guestcheck_core::{GUESTS_TABLE, Guest, INVITATION_UNITS_TABLE, InvitationUnit, RowId};

use crate::client::{ScopeUser, TestContext, UserSource};
use crate::fixtures::{self, GuestTemplate};
use crate::queries;

/// Number of verified guests echoed back in a report.
const VERIFICATION_SAMPLE: usize = 3;

#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Owner to seed for; discovered from `profiles` when unset.
    pub user_id: Option<String>,
    /// Display name of the invitation unit.
    pub unit_name: String,
    pub roster: Vec<GuestTemplate>,
}

impl SeedOptions {
    pub fn new(unit_name: impl Into<String>) -> Self {
        Self {
            user_id: None,
            unit_name: unit_name.into(),
            roster: fixtures::confirmed_roster().to_vec(),
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSource {
    Created,
    /// Creation failed and a unit already owned by the user was reused.
    Existing,
}

/// A roster entry that did not make it into the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedFailure {
    pub guest: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub user: ScopeUser,
    pub unit_id: RowId,
    pub unit_source: UnitSource,
    pub submitted: usize,
    pub created: Vec<Guest>,
    pub failures: Vec<SeedFailure>,
    /// Confirmed guests of the user found after seeding, if the query worked.
    pub verified: Option<usize>,
    pub verification_error: Option<String>,
    pub sample: Vec<Guest>,
}

impl SeedReport {
    /// The verification query sees exactly the guests that were not reported
    /// as failed.
    pub fn verification_matches(&self) -> bool {
        self.verified == Some(self.submitted - self.failures.len())
    }
}

pub async fn seed_confirmed_guests(
    ctx: &TestContext,
    options: &SeedOptions,
) -> Result<SeedReport> {
    let rest = ctx.rest()?;
    let user = match &options.user_id {
        Some(id) => ScopeUser {
            user_id: id.clone(),
            source: UserSource::Explicit,
        },
        None => ctx.scope_user().await.clone(),
    };
    info!(user_id = %user.user_id, source = ?user.source, "seeding confirmed guests");

    let (unit_id, unit_source) = ensure_unit(ctx, &user.user_id, &options.unit_name).await?;
    info!(unit_id = %unit_id, source = ?unit_source, "invitation unit ready");

    let mut created = Vec::new();
    let mut failures = Vec::new();
    for template in &options.roster {
        let guest = template.to_new_guest(&user.user_id, &unit_id);
        if let Err(errors) = validate_guest(&guest) {
            failures.push(SeedFailure {
                guest: template.display_name.to_string(),
                reason: describe(&errors),
            });
            continue;
        }
        match rest.insert::<_, Guest>(GUESTS_TABLE, &guest).await {
            Ok(row) => {
                info!(id = %row.id, name = %row.nome_visualizzato, "guest created");
                created.push(row);
            }
            Err(e) => {
                warn!(name = template.display_name, "guest creation failed: {e:#}");
                failures.push(SeedFailure {
                    guest: template.display_name.to_string(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    let (verified, verification_error, sample) = match rest
        .select::<Guest>(GUESTS_TABLE, &queries::seed_verification(&user.user_id))
        .await
    {
        Ok(mut rows) => {
            let count = rows.len();
            rows.truncate(VERIFICATION_SAMPLE);
            (Some(count), None, rows)
        }
        Err(e) => {
            warn!("verification query failed: {e:#}");
            (None, Some(format!("{e:#}")), Vec::new())
        }
    };

    Ok(SeedReport {
        user,
        unit_id,
        unit_source,
        submitted: options.roster.len(),
        created,
        failures,
        verified,
        verification_error,
        sample,
    })
}

/// Create a unit for `user_id`, or fall back to one it already owns.
async fn ensure_unit(
    ctx: &TestContext,
    user_id: &str,
    name: &str,
) -> Result<(RowId, UnitSource)> {
    let rest = ctx.rest()?;
    let unit = fixtures::invitation_unit(user_id, name);

    let create_error = match validate_unit(&unit) {
        Err(errors) => anyhow!(describe(&errors)),
        Ok(()) => match rest
            .insert::<_, InvitationUnit>(INVITATION_UNITS_TABLE, &unit)
            .await
        {
            Ok(row) => return Ok((row.id, UnitSource::Created)),
            Err(e) => e,
        },
    };
    warn!("invitation unit creation failed ({create_error:#}), looking for an existing one");

    let existing: Vec<InvitationUnit> = rest
        .select(INVITATION_UNITS_TABLE, &queries::unit_for_user(user_id))
        .await
        .with_context(|| format!("unit creation failed ({create_error:#}) and lookup failed"))?;
    match existing.into_iter().next() {
        Some(row) => Ok((row.id, UnitSource::Existing)),
        None => Err(anyhow!(
            "no invitation unit available for user {user_id}: creation failed ({create_error:#}) \
             and none exists"
        )),
    }
}
