use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::client::TestContext;
use crate::specs;

/// Result of running a single spec.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub error: Option<String>,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

/// Aggregated results of a full test run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestSuite {
    pub results: Vec<TestResult>,
}

impl TestSuite {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// True when every selected spec passed. An empty selection does not count
    /// as success.
    pub fn success(&self) -> bool {
        self.total() > 0 && self.failed() == 0
    }

    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Which spec modules a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuiteKind {
    Backend,
    Supabase,
    Frontend,
    #[default]
    All,
}

impl SuiteKind {
    pub fn includes(self, module: &str) -> bool {
        match self {
            Self::Backend => module == "backend",
            Self::Supabase => module == "supabase",
            Self::Frontend => module == "frontend",
            Self::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// One spec at a time, in declaration order.
    #[default]
    Sequential,
    /// Every selected spec spawned on a `JoinSet`.
    Parallel,
}

async fn timed<F>(name: &'static str, fut: F) -> TestResult
where
    F: Future<Output = anyhow::Result<()>>,
{
    let start = Instant::now();
    let result = fut.await;
    let duration = start.elapsed();
    match &result {
        Ok(()) => debug!(spec = name, ?duration, "passed"),
        Err(e) => info!(spec = name, ?duration, "failed: {e:#}"),
    }
    TestResult {
        name: name.to_string(),
        passed: result.is_ok(),
        duration,
        error: result.err().map(|e| format!("{e:#}")),
    }
}

/// Run the selected specs.
///
/// - `suite`: which spec modules to include.
/// - `filter`: optional substring filter on spec names (`module::name`).
/// - `mode`: sequential or concurrent execution.
///
/// A failing spec never stops the run. Results are sorted by name.
pub async fn run_all(
    ctx: Arc<TestContext>,
    suite: SuiteKind,
    filter: Option<&str>,
    mode: RunMode,
) -> TestSuite {
    let mut results = Vec::new();
    let mut set = JoinSet::new();

    macro_rules! run_spec {
        ($module:ident :: $name:ident) => {
            let spec_name = concat!(stringify!($module), "::", stringify!($name));
            if suite.includes(stringify!($module)) && filter.is_none_or(|f| spec_name.contains(f))
            {
                match mode {
                    RunMode::Sequential => {
                        results.push(timed(spec_name, specs::$module::$name(&ctx)).await);
                    }
                    RunMode::Parallel => {
                        let ctx = ctx.clone();
                        set.spawn(
                            async move { timed(spec_name, specs::$module::$name(&ctx)).await },
                        );
                    }
                }
            }
        };
    }

    crate::for_each_spec!(run_spec);

    while let Some(result) = set.join_next().await {
        match result {
            Ok(r) => results.push(r),
            Err(e) => results.push(TestResult {
                name: "unknown (join error)".into(),
                passed: false,
                duration: Duration::ZERO,
                error: Some(format!("{e:#}")),
            }),
        }
    }

    results.sort_by(|a, b| a.name.cmp(&b.name));
    TestSuite { results }
}
