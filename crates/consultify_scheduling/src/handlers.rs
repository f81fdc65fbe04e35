// File: crates/consultify_scheduling/src/handlers.rs
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

use consultify_common::{map_json_error, CommonError};
use consultify_config::AppConfig;

use crate::directory::SlotDirectory;
use crate::models::{AvailableDatesResponse, SlotsForDateQuery, SlotsForDateResponse};

// Shared state for scheduling handlers
#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub directory: Arc<SlotDirectory>,
}

/// Handler to list the dates that currently have bookable slots.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/scheduling/dates", // Path relative to /api
    responses(
        (status = 200, description = "Dates with at least one bookable slot", body = AvailableDatesResponse),
        (status = 503, description = "Scheduling service is disabled")
    ),
    tag = "Scheduling"
))]
pub async fn list_dates_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<AvailableDatesResponse>, (StatusCode, String)> {
    if !state.config.use_scheduling {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Scheduling service is disabled.".to_string(),
        ));
    }

    // A failed refresh leaves an empty calendar rather than an error: the
    // selector renders "no dates available" and stays usable.
    if let Err(err) = state.directory.refresh().await {
        warn!("Slot directory refresh failed: {}", err);
    }

    let dates: Vec<_> = state
        .directory
        .available_dates()
        .await
        .into_iter()
        .collect();
    Ok(Json(AvailableDatesResponse {
        dates,
        timezone: state.directory.timezone().name().to_string(),
        horizon_days: state.directory.horizon_days(),
        refreshed_at: state.directory.refreshed_at().await,
    }))
}

/// Handler to list the bookable slots on one calendar date.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/scheduling/slots", // Path relative to /api
    params(SlotsForDateQuery),
    responses(
        (status = 200, description = "Bookable slots on the requested date, sorted by start time", body = SlotsForDateResponse),
        (status = 422, description = "Date is in the past or beyond the booking horizon"),
        (status = 502, description = "Availability backend unreachable"),
        (status = 503, description = "Scheduling service is disabled")
    ),
    tag = "Scheduling"
))]
pub async fn list_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<SlotsForDateQuery>,
) -> Result<Json<SlotsForDateResponse>, Response> {
    if !state.config.use_scheduling {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Scheduling service is disabled.".to_string(),
        )
            .into_response());
    }

    if let Err(err) = state.directory.validate_query_date(query.date) {
        return Err(CommonError::from(err).into_response());
    }

    let result = state
        .directory
        .slots_for_date(query.date)
        .await
        .map(|slots| SlotsForDateResponse {
            date: query.date,
            slots,
        });
    map_json_error(result, CommonError::from)
}
