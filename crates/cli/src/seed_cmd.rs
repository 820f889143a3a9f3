use anyhow::Result;
use clap::Args;

use guestcheck_config::SuiteConfig;
use guestcheck_e2e::client::TestContext;
use guestcheck_e2e::seed::{SeedOptions, SeedReport, seed_confirmed_guests};

use crate::output::{OutputFormat, guest_line, print_json};

#[derive(Args)]
pub struct SeedArgs {
    /// Owner id for the new rows (default: first profile, then the configured fallback)
    #[arg(long)]
    pub user: Option<String>,

    /// Display name of the invitation unit (default: seed.unit_name)
    #[arg(long)]
    pub unit_name: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Seed confirmed guests. Only a missing invitation unit is an error; guest
/// failures are listed and the command still succeeds.
pub async fn run_seed(args: SeedArgs, config: &SuiteConfig) -> Result<()> {
    let ctx = TestContext::from_config(config)?;
    let unit_name = args
        .unit_name
        .unwrap_or_else(|| config.seed.unit_name.clone());
    let mut options = SeedOptions::new(unit_name);
    if let Some(user) = args.user {
        options = options.for_user(user);
    }

    let report = seed_confirmed_guests(&ctx, &options).await?;
    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print_text(&report);
            Ok(())
        }
    }
}

fn print_text(report: &SeedReport) {
    eprintln!("user: {} ({:?})", report.user.user_id, report.user.source);
    eprintln!("invitation unit: {} ({:?})", report.unit_id, report.unit_source);

    eprintln!("\ncreated {} of {} guests", report.created.len(), report.submitted);
    for guest in &report.created {
        eprintln!("  {}", guest_line(guest));
    }
    for failure in &report.failures {
        eprintln!("  FAILED {}: {}", failure.guest, failure.reason);
    }

    match (report.verified, &report.verification_error) {
        (Some(count), _) => {
            eprintln!("\nverification: {count} confirmed guests for this user");
            for guest in &report.sample {
                eprintln!("  {}", guest_line(guest));
            }
            if !report.verification_matches() {
                eprintln!(
                    "  expected {}; the user may already have had confirmed guests",
                    report.submitted - report.failures.len()
                );
            }
        }
        (None, Some(err)) => eprintln!("\nverification query failed: {err}"),
        (None, None) => {}
    }
}
