//! Shared configuration for the guestcheck suites, seeding and inspection.
//!
//! Values come from three layers, lowest precedence first: built-in
//! defaults, `guestcheck.toml`, and environment variables. When no backend
//! URL is known after that, the frontend's dotenv file named in
//! `backend.env_file` is consulted for `REACT_APP_BACKEND_URL`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "guestcheck.toml";

/// Key the frontend's `.env` uses for the backend base URL.
pub const BACKEND_URL_ENV_KEY: &str = "REACT_APP_BACKEND_URL";

pub const ENV_BACKEND_URL: &str = "GUESTCHECK_BACKEND_URL";
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_FRONTEND_URL: &str = "GUESTCHECK_FRONTEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "GUESTCHECK_TIMEOUT_SECS";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read env file at {path}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Top-level configuration (persisted as `guestcheck.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SuiteConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub frontend: FrontendSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub seed: SeedSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendSettings {
    /// Base URL without the `/api` suffix.
    #[serde(default)]
    pub url: Option<String>,
    /// Dotenv file holding `REACT_APP_BACKEND_URL`.
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupabaseSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FrontendSettings {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSettings {
    /// Owner used when the profiles table is empty or unreadable.
    #[serde(default = "default_fallback_user_id")]
    pub fallback_user_id: String,
    #[serde(default = "default_unit_name")]
    pub unit_name: String,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            fallback_user_id: default_fallback_user_id(),
            unit_name: default_unit_name(),
        }
    }
}

// ── Serde default functions ─────────────────────────────────────────────

fn default_timeout_secs() -> u64 {
    10
}
fn default_fallback_user_id() -> String {
    "test-user-confirmed-guests".to_string()
}
fn default_unit_name() -> String {
    "Test Family".to_string()
}

impl SuiteConfig {
    /// Parse a config document.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content, path)?;
        if let Some(env_file) = config.backend.env_file.take() {
            config.backend.env_file = Some(resolve_relative(path, env_file));
        }
        Ok(config)
    }

    /// Overlay environment variables. `lookup` is injected so callers and
    /// tests never need to mutate the process environment.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BACKEND_URL).or_else(|| get(BACKEND_URL_ENV_KEY)) {
            self.backend.url = Some(url);
        }
        if let Some(url) = get(ENV_SUPABASE_URL) {
            self.supabase.url = Some(url);
        }
        if let Some(key) = get(ENV_SUPABASE_ANON_KEY) {
            self.supabase.anon_key = Some(key);
        }
        if let Some(url) = get(ENV_FRONTEND_URL) {
            self.frontend.url = Some(url);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.http.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Fill `backend.url` from the dotenv file when it is still unset.
    /// Returns true when the file provided the URL.
    pub fn resolve_backend_env_file(&mut self) -> Result<bool, ConfigError> {
        if self.backend.url.is_some() {
            return Ok(false);
        }
        let Some(path) = self.backend.env_file.clone() else {
            return Ok(false);
        };
        let url = read_env_file_value(&path, BACKEND_URL_ENV_KEY)?;
        let found = url.is_some();
        self.backend.url = url;
        Ok(found)
    }

    /// Copy safe to print: the anon key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(key) = copy.supabase.anon_key.as_mut() {
            *key = redact(key);
        }
        copy
    }
}

/// Load the full layered configuration.
pub fn load(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SuiteConfig, ConfigError> {
    let mut config = SuiteConfig::from_file(path)?;
    config.apply_env_overrides(lookup)?;
    config.resolve_backend_env_file()?;
    Ok(config)
}

fn read_env_file_value(path: &Path, key: &str) -> Result<Option<String>, ConfigError> {
    let to_error = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (name, value) = item.map_err(to_error)?;
        if name == key && !value.trim().is_empty() {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn resolve_relative(config_path: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    match config_path.parent() {
        Some(dir) => dir.join(target),
        None => target,
    }
}

fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
