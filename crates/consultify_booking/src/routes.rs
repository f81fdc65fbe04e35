// --- File: crates/consultify_booking/src/routes.rs ---

use crate::handlers::{
    get_session_handler, open_session_handler, reset_session_handler, select_date_handler,
    select_slot_handler, submit_contact_handler, submit_payment_handler, BookingState,
};
use crate::logic::BookingEngine;
use axum::{
    routing::{get, post},
    Router,
};
use consultify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the booking flow.
/// The caller owns the engine so its slot directory can be shared with
/// the scheduling routes.
pub fn routes(config: Arc<AppConfig>, engine: Arc<BookingEngine>) -> Router {
    let state = Arc::new(BookingState { config, engine });

    Router::new()
        .route("/booking/sessions", post(open_session_handler))
        .route("/booking/sessions/{id}", get(get_session_handler))
        .route(
            "/booking/sessions/{id}/select-date",
            post(select_date_handler),
        )
        .route(
            "/booking/sessions/{id}/select-slot",
            post(select_slot_handler),
        )
        .route(
            "/booking/sessions/{id}/contact",
            post(submit_contact_handler),
        )
        .route(
            "/booking/sessions/{id}/payment",
            post(submit_payment_handler),
        )
        .route("/booking/sessions/{id}/reset", post(reset_session_handler))
        .with_state(state)
}
