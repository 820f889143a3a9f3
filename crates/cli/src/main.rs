mod config_cmd;
mod inspect_cmd;
mod output;
mod seed_cmd;
mod settings;
mod test_cmd;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "guestcheck",
    version,
    about = "Smoke tests, seeding and inspection for the wedding guest-management stack"
)]
struct Cli {
    /// Config file (default: $GUESTCHECK_CONFIG, then ./guestcheck.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG is honoured as well.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the backend, database and frontend specs
    Test(test_cmd::TestArgs),

    /// Create one invitation unit and a roster of confirmed guests
    Seed(seed_cmd::SeedArgs),

    /// Read-only summary of the guest table
    Inspect(inspect_cmd::InspectArgs),

    /// Show the resolved configuration (secrets redacted)
    Config(config_cmd::ConfigArgs),
}

fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    }
}

/// `-v` wins; otherwise a non-empty RUST_LOG, otherwise warnings only.
fn env_filter(verbose: u8) -> EnvFilter {
    let rust_log_set = std::env::var(EnvFilter::DEFAULT_ENV).is_ok_and(|v| !v.trim().is_empty());
    if verbose == 0 && rust_log_set {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::default().add_directive(log_level(verbose).into())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A local .env may carry SUPABASE_URL and friends.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(cli.verbose))
        .init();

    let result = match settings::load(cli.config.as_deref()) {
        Ok(loaded) => match cli.command {
            Commands::Test(args) => test_cmd::run_test(args, &loaded.config).await,
            Commands::Seed(args) => seed_cmd::run_seed(args, &loaded.config).await,
            Commands::Inspect(args) => inspect_cmd::run_inspect(args, &loaded.config).await,
            Commands::Config(args) => config_cmd::run_show(args, &loaded),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
