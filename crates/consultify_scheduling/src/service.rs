// --- File: crates/consultify_scheduling/src/service.rs ---
//! `reqwest` client for the upstream availability/booking backend.

use chrono::NaiveDate;
use std::env;
use tracing::{error, info};

use consultify_common::services::{
    Booking, BookingAttempt, BookingRequest, BoxFuture, SchedulingService, Slot,
};
use consultify_common::{create_client, HTTP_CLIENT};
use consultify_config::SchedulingConfig;

use crate::error::SchedulingError;

/// Client for the scheduling backend's REST API.
///
/// The API key is read from the `SCHEDULING_API_KEY` environment variable;
/// requests go out unauthenticated when it is absent.
pub struct SchedulingApiService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SchedulingApiService {
    pub fn new(config: &SchedulingConfig) -> Self {
        let client = create_client(30, true).unwrap_or_else(|_| HTTP_CLIENT.clone());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: env::var("SCHEDULING_API_KEY").ok(),
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn fetch_slots(&self, url: String) -> Result<Vec<Slot>, SchedulingError> {
        let response = self.authorized(self.client.get(&url)).send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            let slots: Vec<Slot> = serde_json::from_str(&body_text)?;
            Ok(slots)
        } else {
            let message = extract_error_message(&body_text);
            error!(
                "[Scheduling API] Slot listing failed with HTTP status: {}. Message: {}",
                status, message
            );
            Err(SchedulingError::ApiError {
                status_code: status.as_u16(),
                message,
            })
        }
    }

    async fn post_booking(
        &self,
        request: BookingRequest,
    ) -> Result<BookingAttempt, SchedulingError> {
        let url = format!("{}/bookings", self.base_url);
        info!(
            "[Scheduling API] Creating booking for slot: {}",
            request.slot_id
        );

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            let booking: Booking = serde_json::from_str(&body_text)?;
            info!(
                "[Scheduling API] Booking {} created for slot {}",
                booking.id, booking.slot_id
            );
            Ok(BookingAttempt::Created(booking))
        } else {
            let message = extract_error_message(&body_text);
            if is_contention(status.as_u16(), &message) {
                info!(
                    "[Scheduling API] Slot {} no longer available: {}",
                    request.slot_id, message
                );
                Ok(BookingAttempt::SlotTaken { message })
            } else {
                error!(
                    "[Scheduling API] Booking creation failed with HTTP status: {}. Message: {}",
                    status, message
                );
                Err(SchedulingError::ApiError {
                    status_code: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn post_confirmation(
        &self,
        payment_intent_id: String,
    ) -> Result<Booking, SchedulingError> {
        let url = format!("{}/payment-confirmations", self.base_url);
        info!(
            "[Scheduling API] Confirming payment for intent: {}",
            payment_intent_id
        );

        let body = serde_json::json!({ "payment_intent_id": payment_intent_id });
        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            let booking: Booking = serde_json::from_str(&body_text)?;
            Ok(booking)
        } else {
            let message = extract_error_message(&body_text);
            error!(
                "[Scheduling API] Payment confirmation failed with HTTP status: {}. Message: {}",
                status, message
            );
            Err(SchedulingError::ApiError {
                status_code: status.as_u16(),
                message,
            })
        }
    }
}

/// Pulls a human-readable message out of an upstream error body. Accepts
/// `{"error": "..."}`, `{"error": {"message": "..."}}` and `{"message": "..."}`,
/// falling back to the raw body.
pub(crate) fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json_body) => {
            if let Some(message) = json_body.get("error").and_then(|e| e.as_str()) {
                return message.to_string();
            }
            if let Some(message) = json_body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                return message.to_string();
            }
            json_body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(body)
                .to_string()
        }
        Err(_) => body.to_string(),
    }
}

/// Whether an upstream rejection means the slot went to someone else. The
/// backend signals contention as 409, or as 400 with a "not available"
/// message on older deployments.
pub(crate) fn is_contention(status: u16, message: &str) -> bool {
    status == 409 || (status == 400 && message.to_lowercase().contains("not available"))
}

impl SchedulingService for SchedulingApiService {
    type Error = SchedulingError;

    fn list_available_slots(&self) -> BoxFuture<'_, Vec<Slot>, Self::Error> {
        let url = format!("{}/available-slots", self.base_url);
        Box::pin(async move { self.fetch_slots(url).await })
    }

    fn list_slots_for_date(&self, date: NaiveDate) -> BoxFuture<'_, Vec<Slot>, Self::Error> {
        let url = format!("{}/slots?date={}", self.base_url, date.format("%Y-%m-%d"));
        Box::pin(async move { self.fetch_slots(url).await })
    }

    fn create_booking(
        &self,
        request: BookingRequest,
    ) -> BoxFuture<'_, BookingAttempt, Self::Error> {
        Box::pin(async move { self.post_booking(request).await })
    }

    fn confirm_payment(&self, payment_intent_id: &str) -> BoxFuture<'_, Booking, Self::Error> {
        // Clone the id to avoid lifetime issues
        let payment_intent_id = payment_intent_id.to_string();
        Box::pin(async move { self.post_confirmation(payment_intent_id).await })
    }
}
