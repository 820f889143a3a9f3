use std::sync::Arc;

use clap::{Args, ValueEnum};
use serde::Serialize;

use guestcheck_config::SuiteConfig;
use guestcheck_core::planner::DataSource;
use guestcheck_e2e::client::TestContext;
use guestcheck_e2e::runner::{self, RunMode, SuiteKind, TestResult};
use guestcheck_e2e::verdict;

use crate::output::{OutputFormat, print_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteArg {
    Backend,
    Supabase,
    Frontend,
    All,
}

impl From<SuiteArg> for SuiteKind {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Backend => SuiteKind::Backend,
            SuiteArg::Supabase => SuiteKind::Supabase,
            SuiteArg::Frontend => SuiteKind::Frontend,
            SuiteArg::All => SuiteKind::All,
        }
    }
}

#[derive(Args)]
pub struct TestArgs {
    /// Which spec module to run
    #[arg(long, value_enum, default_value_t = SuiteArg::All)]
    pub suite: SuiteArg,

    /// Filter specs by substring of `module::name`
    #[arg(long)]
    pub filter: Option<String>,

    /// Run the selected specs concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Skip the planner data-source verdict
    #[arg(long)]
    pub no_verdict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct TestRunOutput<'a> {
    passed: usize,
    failed: usize,
    total: usize,
    results: &'a [TestResult],
    data_source: Option<DataSource>,
}

pub async fn run_test(args: TestArgs, config: &SuiteConfig) -> anyhow::Result<()> {
    let ctx = Arc::new(TestContext::from_config(config)?);
    let suite_kind = SuiteKind::from(args.suite);
    let mode = if args.parallel {
        RunMode::Parallel
    } else {
        RunMode::Sequential
    };

    if args.format == OutputFormat::Text {
        eprintln!("Running {:?} specs ({mode:?})", args.suite);
    }
    let suite = runner::run_all(ctx.clone(), suite_kind, args.filter.as_deref(), mode).await;

    let wants_verdict = !args.no_verdict && suite_kind != SuiteKind::Backend && suite.total() > 0;
    let data_source = if wants_verdict {
        Some(verdict::data_source(&ctx).await)
    } else {
        None
    };

    match args.format {
        OutputFormat::Json => print_json(&TestRunOutput {
            passed: suite.passed(),
            failed: suite.failed(),
            total: suite.total(),
            results: &suite.results,
            data_source,
        })?,
        OutputFormat::Text => {
            for r in &suite.results {
                let icon = if r.passed { "PASS" } else { "FAIL" };
                let dur = format!("{:.0}ms", r.duration.as_secs_f64() * 1000.0);
                eprintln!("  {icon} {name} ({dur})", name = r.name);
                if let Some(ref err) = r.error {
                    eprintln!("       {err}");
                }
            }

            if suite.total() == 0 {
                eprintln!("\nno specs matched the selection");
            } else {
                eprintln!(
                    "\n{} passed, {} failed, {} total",
                    suite.passed(),
                    suite.failed(),
                    suite.total()
                );
            }
            if let Some(source) = data_source {
                eprintln!("planner data: {}", source.describe());
            }
        }
    }

    if !suite.success() {
        std::process::exit(1);
    }

    Ok(())
}
