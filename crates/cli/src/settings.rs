use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use guestcheck_config::{CONFIG_FILE_NAME, SuiteConfig};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "GUESTCHECK_CONFIG";

pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: SuiteConfig,
}

/// `--config`, then `$GUESTCHECK_CONFIG`, then `./guestcheck.toml`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = config_path(explicit);
    let config = guestcheck_config::load(&path, |key| std::env::var(key).ok())
        .with_context(|| format!("load configuration from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(LoadedConfig { path, config })
}
