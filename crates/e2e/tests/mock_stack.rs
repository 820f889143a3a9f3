//! Every spec against a healthy in-process stack, plus runner behaviour.

mod support;

use std::sync::Arc;

use guestcheck_core::planner::DataSource;
use guestcheck_e2e::client::TestContext;
use guestcheck_e2e::runner::{RunMode, SuiteKind, run_all};
use guestcheck_e2e::verdict::data_source;
use serde_json::json;
use support::{MockOptions, MockStack};

/// A stack with one user and a mix of confirmed and undecided guests.
async fn healthy_stack() -> (MockStack, Arc<TestContext>) {
    let stack = MockStack::start().await;
    stack.add_profile("user-a");
    stack.add_guest("user-a", "Marco Rossi", Some("Famiglia dello sposo"), Some(true));
    stack.add_guest("user-a", "Anna Bianchi", None, Some(true));
    stack.add_guest("user-a", "Luigi Verdi", Some("Amici dello sposo"), None);
    let ctx = stack.context();
    (stack, ctx)
}

macro_rules! mock_test {
    ($module:ident :: $name:ident) => {
        #[tokio::test]
        async fn $name() {
            let (_stack, ctx) = healthy_stack().await;
            guestcheck_e2e::specs::$module::$name(&ctx).await.unwrap();
        }
    };
}

guestcheck_e2e::for_each_spec!(mock_test);

#[tokio::test]
async fn sequential_run_passes_every_spec() {
    let (_stack, ctx) = healthy_stack().await;
    let suite = run_all(ctx, SuiteKind::All, None, RunMode::Sequential).await;
    for r in suite.results.iter().filter(|r| !r.passed) {
        eprintln!("{}: {:?}", r.name, r.error);
    }
    assert_eq!(suite.total(), 13);
    assert!(suite.success());
}

#[tokio::test]
async fn parallel_run_matches_sequential() {
    let (_stack, ctx) = healthy_stack().await;
    let sequential = run_all(ctx.clone(), SuiteKind::All, None, RunMode::Sequential).await;
    let parallel = run_all(ctx, SuiteKind::All, None, RunMode::Parallel).await;

    let names = |s: &guestcheck_e2e::runner::TestSuite| {
        s.results.iter().map(|r| r.name.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&sequential), names(&parallel));
    assert!(parallel.success());
}

#[tokio::test]
async fn results_are_sorted_by_name() {
    let (_stack, ctx) = healthy_stack().await;
    let suite = run_all(ctx, SuiteKind::All, None, RunMode::Parallel).await;
    let names: Vec<_> = suite.results.iter().map(|r| r.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn suite_selection_limits_modules() {
    let (_stack, ctx) = healthy_stack().await;
    let backend = run_all(ctx.clone(), SuiteKind::Backend, None, RunMode::Sequential).await;
    assert_eq!(backend.total(), 4);
    assert!(backend.results.iter().all(|r| r.name.starts_with("backend::")));

    let supabase = run_all(ctx.clone(), SuiteKind::Supabase, None, RunMode::Sequential).await;
    assert_eq!(supabase.total(), 6);

    let frontend = run_all(ctx, SuiteKind::Frontend, None, RunMode::Sequential).await;
    assert_eq!(frontend.total(), 3);
}

#[tokio::test]
async fn filter_matches_substrings() {
    let (_stack, ctx) = healthy_stack().await;
    let suite = run_all(
        ctx.clone(),
        SuiteKind::All,
        Some("supabase::conn"),
        RunMode::Sequential,
    )
    .await;
    assert_eq!(suite.total(), 1);
    assert_eq!(suite.results[0].name, "supabase::connection");

    let none = run_all(ctx, SuiteKind::Backend, Some("planner"), RunMode::Sequential).await;
    assert_eq!(none.total(), 0);
    assert!(!none.success());
}

#[tokio::test]
async fn verdict_reports_real_data() {
    let (_stack, ctx) = healthy_stack().await;
    assert_eq!(data_source(&ctx).await, DataSource::RealData);
}

#[tokio::test]
async fn verdict_reports_mock_fallback_without_confirmed_guests() {
    let stack = MockStack::start().await;
    stack.add_guest("user-a", "Luigi Verdi", None, Some(false));
    assert_eq!(data_source(&stack.context()).await, DataSource::MockFallback);
}

#[tokio::test]
async fn verdict_reports_unavailable_when_query_fails() {
    let stack = MockStack::with_options(MockOptions {
        hidden_tables: vec!["invitati"],
        ..Default::default()
    })
    .await;
    assert_eq!(data_source(&stack.context()).await, DataSource::Unavailable);
}

#[tokio::test]
async fn scope_user_comes_from_first_profile() {
    let (_stack, ctx) = healthy_stack().await;
    let user = ctx.scope_user().await;
    assert_eq!(user.user_id, "user-a");
    assert_eq!(user.source, guestcheck_e2e::client::UserSource::Profile);
}

#[tokio::test]
async fn scope_user_ignores_profile_key_type() {
    let stack = MockStack::start().await;
    stack.add_row(
        "profiles",
        json!({ "id": 41, "user_id": "user-int", "full_name": null }),
    );
    let ctx = stack.context();
    let user = ctx.scope_user().await;
    assert_eq!(user.user_id, "user-int");
    assert_eq!(user.source, guestcheck_e2e::client::UserSource::Profile);
}
