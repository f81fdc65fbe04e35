// File: crates/consultify_scheduling/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::models::{AvailableDatesResponse, Slot, SlotsForDateQuery, SlotsForDateResponse};

#[utoipa::path(
    get,
    path = "/scheduling/dates",
    responses(
        (status = 200, description = "Dates with at least one bookable slot", body = AvailableDatesResponse,
         example = json!({
             "dates": ["2025-09-12", "2025-09-15", "2025-09-16"],
             "timezone": "UTC",
             "horizon_days": 60,
             "refreshed_at": "2025-09-10T08:30:00Z"
         })
        ),
        (status = 503, description = "Scheduling service is disabled",
         example = json!("Scheduling service is disabled.")
        )
    )
)]
fn doc_list_dates_handler() {}

#[utoipa::path(
    get,
    path = "/scheduling/slots",
    params(
        ("date" = String, Query, description = "Calendar date in YYYY-MM-DD format", example = "2025-09-15", format = "date")
    ),
    responses(
        (status = 200, description = "Bookable slots on the requested date, sorted by start time", body = SlotsForDateResponse,
         example = json!({
             "date": "2025-09-15",
             "slots": [
                 {
                     "id": "slot-2025-09-15-0900",
                     "start_time": "2025-09-15T09:00:00Z",
                     "duration_minutes": 30,
                     "requires_payment": true,
                     "payment_amount_cents": 1000
                 }
             ]
         })
        ),
        (status = 422, description = "Date is in the past or beyond the booking horizon"),
        (status = 502, description = "Availability backend unreachable")
    )
)]
fn doc_list_slots_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_list_dates_handler, doc_list_slots_handler),
    components(
        schemas(
            Slot,
            SlotsForDateQuery,
            AvailableDatesResponse,
            SlotsForDateResponse
        )
    ),
    tags(
        (name = "scheduling", description = "Consultation slot availability API")
    ),
    servers(
        (url = "/api", description = "Scheduling API server")
    )
)]
pub struct SchedulingApiDoc;
