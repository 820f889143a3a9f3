use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use guestcheck_client::{BackendClient, RestClient, RowQuery};
use guestcheck_config::SuiteConfig;
use guestcheck_core::{Guest, PROFILES_TABLE, Profile};

use crate::queries;

/// Endpoints and credentials a run is pointed at. Any of them may be absent;
/// specs needing a missing target fail with a configuration error.
#[derive(Debug, Clone)]
pub struct Targets {
    pub backend_url: Option<String>,
    pub supabase_url: Option<String>,
    pub anon_key: Option<String>,
    pub frontend_url: Option<String>,
    pub fallback_user_id: String,
}

impl Targets {
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            backend_url: config.backend.url.clone(),
            supabase_url: config.supabase.url.clone(),
            anon_key: config.supabase.anon_key.clone(),
            frontend_url: config.frontend.url.clone(),
            fallback_user_id: config.seed.fallback_user_id.clone(),
        }
    }
}

/// Owner id that seeded rows are scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeUser {
    pub user_id: String,
    pub source: UserSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSource {
    /// Given on the command line.
    Explicit,
    /// First row of the profiles table.
    Profile,
    /// Configured placeholder, used when no profile could be read.
    Fallback,
}

/// Holds connection info and shared discovery state for a run.
pub struct TestContext {
    http: reqwest::Client,
    backend: Option<BackendClient>,
    rest: Option<RestClient>,
    frontend_url: Option<String>,
    fallback_user_id: String,
    scope_user: OnceCell<ScopeUser>,
}

impl TestContext {
    /// Build every client on top of one shared `reqwest::Client`.
    pub fn new(http: reqwest::Client, targets: Targets) -> Self {
        let backend = targets
            .backend_url
            .as_deref()
            .map(|url| BackendClient::with_client(http.clone(), url));
        let rest = match (targets.supabase_url.as_deref(), targets.anon_key.as_deref()) {
            (Some(url), Some(key)) => Some(RestClient::with_client(http.clone(), url, key)),
            _ => None,
        };
        Self {
            http,
            backend,
            rest,
            frontend_url: targets.frontend_url,
            fallback_user_id: targets.fallback_user_id,
            scope_user: OnceCell::new(),
        }
    }

    pub fn from_config(config: &SuiteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .context("build HTTP client")?;
        Ok(Self::new(http, Targets::from_config(config)))
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn backend(&self) -> Result<&BackendClient> {
        self.backend
            .as_ref()
            .context("backend URL not configured (backend.url or GUESTCHECK_BACKEND_URL)")
    }

    pub fn rest(&self) -> Result<&RestClient> {
        self.rest.as_ref().context(
            "database not configured (supabase.url and supabase.anon_key, or SUPABASE_URL and SUPABASE_ANON_KEY)",
        )
    }

    pub fn frontend_url(&self) -> Result<&str> {
        self.frontend_url
            .as_deref()
            .context("frontend URL not configured (frontend.url or GUESTCHECK_FRONTEND_URL)")
    }

    /// Discover the owner id to scope seeded rows to, once per run.
    ///
    /// Uses the first profile row; any failure to read one falls back to
    /// the configured placeholder.
    pub async fn scope_user(&self) -> &ScopeUser {
        self.scope_user
            .get_or_init(|| async {
                match self.first_profile().await {
                    Ok(Some(profile)) => {
                        info!(user_id = %profile.user_id, "using user from profiles");
                        ScopeUser {
                            user_id: profile.user_id,
                            source: UserSource::Profile,
                        }
                    }
                    Ok(None) => {
                        info!("profiles table is empty, using fallback user");
                        self.fallback_user()
                    }
                    Err(e) => {
                        warn!("could not read profiles ({e:#}), using fallback user");
                        self.fallback_user()
                    }
                }
            })
            .await
    }

    fn fallback_user(&self) -> ScopeUser {
        ScopeUser {
            user_id: self.fallback_user_id.clone(),
            source: UserSource::Fallback,
        }
    }

    async fn first_profile(&self) -> Result<Option<Profile>> {
        let profiles: Vec<Profile> = self
            .rest()?
            .select(PROFILES_TABLE, &RowQuery::new().select(&["user_id"]).limit(1))
            .await?;
        Ok(profiles.into_iter().next())
    }

    /// Confirmed guests with the planner's column projection.
    pub async fn confirmed_guests(&self) -> Result<Vec<Guest>> {
        self.rest()?
            .select(guestcheck_core::GUESTS_TABLE, &queries::confirmed_guests())
            .await
    }
}
