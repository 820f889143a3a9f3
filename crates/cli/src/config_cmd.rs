use anyhow::{Context, Result};
use clap::Args;

use crate::output::{OutputFormat, print_json};
use crate::settings::LoadedConfig;

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Print the effective configuration with the anon key masked.
pub fn run_show(args: ConfigArgs, loaded: &LoadedConfig) -> Result<()> {
    let redacted = loaded.config.redacted();
    match args.format {
        OutputFormat::Json => print_json(&redacted),
        OutputFormat::Text => {
            let body = toml::to_string_pretty(&redacted).context("serialize config")?;
            let source = if loaded.path.exists() {
                loaded.path.display().to_string()
            } else {
                format!("{} (not found, defaults + environment)", loaded.path.display())
            };
            println!("# {source}");
            print!("{body}");
            Ok(())
        }
    }
}
