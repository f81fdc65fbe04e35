// --- File: crates/consultify_scheduling/src/routes.rs ---

use crate::directory::SlotDirectory;
use crate::handlers::{list_dates_handler, list_slots_handler, SchedulingState};
use axum::{routing::get, Router};
use consultify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the scheduling feature.
/// The caller owns the directory so it can be shared with the booking flow.
pub fn routes(config: Arc<AppConfig>, directory: Arc<SlotDirectory>) -> Router {
    let state = Arc::new(SchedulingState { config, directory });

    Router::new()
        .route("/scheduling/dates", get(list_dates_handler))
        .route("/scheduling/slots", get(list_slots_handler))
        .with_state(state)
}
