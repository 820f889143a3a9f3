pub mod client;
pub mod fixtures;
pub mod inspect;
pub mod queries;
pub mod runner;
pub mod seed;
pub mod specs;
pub mod verdict;

/// Invoke `$mac!(module::name)` for every spec.
///
/// This is the **single source of truth** for the spec list. Adding a new spec
/// here automatically registers it in `runner::run_all` and in the mock-stack
/// and live integration tests. The module name doubles as the suite name.
#[macro_export]
macro_rules! for_each_spec {
    ($mac:ident) => {
        // backend (4)
        $mac!(backend::root_endpoint);
        $mac!(backend::list_status_checks);
        $mac!(backend::status_check_roundtrip);
        $mac!(backend::cors_configuration);

        // supabase (6)
        $mac!(supabase::connection);
        $mac!(supabase::guest_table_structure);
        $mac!(supabase::confirmed_guests_query);
        $mac!(supabase::user_isolation);
        $mac!(supabase::table_guest_mapping);
        $mac!(supabase::authentication_requirement);

        // frontend (3)
        $mac!(frontend::frontend_accessible);
        $mac!(frontend::auth_settings_endpoint);
        $mac!(frontend::table_planner_data_flow);
    };
}
