//! The PostgREST queries the web application issues, reproduced so the specs
//! exercise exactly what the UI depends on.

use guestcheck_client::RowQuery;
use guestcheck_core::PLANNER_GUEST_COLUMNS;

/// Every confirmed guest with the planner's projection, unordered.
pub fn confirmed_guests() -> RowQuery {
    RowQuery::new()
        .select(&PLANNER_GUEST_COLUMNS)
        .eq("confermato", true)
}

/// The table planner's load query.
pub fn planner_guests() -> RowQuery {
    RowQuery::new()
        .select(&PLANNER_GUEST_COLUMNS)
        .eq("confermato", true)
        .order("nome_visualizzato")
}

/// Confirmed guests owned by `user_id`, used to verify a seed run.
pub fn seed_verification(user_id: &str) -> RowQuery {
    RowQuery::new()
        .eq("confermato", true)
        .eq("user_id", user_id)
        .select_all()
}

/// An existing invitation unit for `user_id`.
pub fn unit_for_user(user_id: &str) -> RowQuery {
    RowQuery::new().eq("user_id", user_id).limit(1)
}
