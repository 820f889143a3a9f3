use anyhow::Result;
use clap::Args;

use guestcheck_config::SuiteConfig;
use guestcheck_e2e::client::TestContext;
use guestcheck_e2e::inspect::{InspectionReport, inspect_guests};

use crate::output::{OutputFormat, guest_line, print_json};

#[derive(Args)]
pub struct InspectArgs {
    /// Number of guest rows to show
    #[arg(long, default_value_t = 5)]
    pub sample: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run_inspect(args: InspectArgs, config: &SuiteConfig) -> Result<()> {
    let ctx = TestContext::from_config(config)?;
    let report = inspect_guests(&ctx, args.sample).await?;
    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print_text(&report);
            Ok(())
        }
    }
}

fn print_text(report: &InspectionReport) {
    let counts = report.counts;
    eprintln!(
        "{} guests: {} confirmed, {} declined, {} unknown",
        report.total(),
        counts.confirmed,
        counts.declined,
        counts.pending
    );
    eprintln!(
        "with name: {}, with group: {}",
        report.quality.with_name, report.quality.with_group
    );

    if !report.sample.is_empty() {
        eprintln!("\nsample:");
        for guest in &report.sample {
            eprintln!("  {}", guest_line(guest));
        }
    }

    eprintln!("\ntables:");
    for table in &report.tables {
        match (table.rows, &table.error) {
            (Some(rows), _) => eprintln!("  {}: {rows} rows", table.table),
            (None, Some(err)) => eprintln!("  {}: unreadable ({err})", table.table),
            (None, None) => eprintln!("  {}: unknown", table.table),
        }
    }
    if let Some(user) = &report.sample_profile_user {
        eprintln!("sample profile user: {user}");
    }

    if report.has_confirmable() {
        eprintln!(
            "\n{} guests could be confirmed for planner testing",
            report.unconfirmed.len() + report.unknown.len()
        );
    } else if counts.confirmed > 0 {
        eprintln!("\nevery guest is confirmed");
    }
}
