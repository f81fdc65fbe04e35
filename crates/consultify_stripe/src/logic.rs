// --- File: crates/consultify_stripe/src/logic.rs ---
//! Payment intent plumbing.
//!
//! Intents are minted by the booking backend (it owns the booking record and
//! validates the amount server-side); the charge itself is confirmed against
//! the Stripe API with the secret key from the environment.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info};

use crate::error::StripeError;
use consultify_common::services::{CardDetails, ChargeOutcome, PaymentIntent};
use consultify_common::HTTP_CLIENT;
use consultify_config::StripeConfig;

// --- Data Structures ---

/// Payload for the booking backend's intent endpoint.
#[derive(Serialize, Debug)]
pub struct CreatePaymentIntentRequest {
    pub booking_id: i64,
    pub amount_cents: i64,
    pub currency: String,
}

#[derive(Deserialize, Debug)]
pub struct CreatePaymentIntentResponse {
    /// Client secret of the form `pi_..._secret_...`.
    pub client_secret: String,
}

/// The slice of Stripe's confirm response we act on.
#[derive(Deserialize, Debug)]
struct PaymentIntentConfirmation {
    pub id: String,
    pub status: String,
}

// --- Core Logic Functions ---

/// Requests a payment intent for a created booking. The backend decides the
/// final amount; the request carries ours so a mismatch is rejected there.
pub async fn create_payment_intent(
    base_url: &str,
    request: &CreatePaymentIntentRequest,
) -> Result<CreatePaymentIntentResponse, StripeError> {
    let api_url = format!("{}/payment-intents", base_url.trim_end_matches('/'));
    info!(
        "[Stripe Logic] Requesting payment intent for booking {} ({} {})",
        request.booking_id, request.amount_cents, request.currency
    );

    let response = HTTP_CLIENT.post(&api_url).json(request).send().await?;

    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        let intent: CreatePaymentIntentResponse = serde_json::from_str(&body_text)?;
        Ok(intent)
    } else {
        let message = extract_error_message(&body_text);
        error!(
            "[Stripe Logic] Intent creation failed with HTTP status: {}. Message: {}",
            status, message
        );
        Err(StripeError::ApiError {
            status_code: status.as_u16(),
            message,
        })
    }
}

/// Confirms the charge for an intent with a tokenized payment method.
///
/// Declines come back as `ChargeOutcome::Declined` with the provider's
/// message; only transport and protocol failures are errors.
pub async fn confirm_payment_intent(
    stripe_config: &StripeConfig,
    intent: &PaymentIntent,
    card: &CardDetails,
) -> Result<ChargeOutcome, StripeError> {
    let stripe_secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| StripeError::ConfigError)?;

    let api_url = format!(
        "{}/v1/payment_intents/{}/confirm",
        stripe_config.api_base_url().trim_end_matches('/'),
        intent.intent_id()
    );
    info!(
        "[Stripe Logic] Confirming payment intent: {}",
        intent.intent_id()
    );

    let form_body: Vec<(String, String)> = vec![
        ("client_secret".to_string(), intent.client_secret.clone()),
        ("payment_method".to_string(), card.payment_method.clone()),
    ];

    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(stripe_secret_key, None::<&str>)
        .form(&form_body)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;

    classify_confirmation(status.as_u16(), &body_text)
}

/// Maps a confirm response to a charge outcome. 402 is a decline; a 2xx
/// whose intent status is anything but `succeeded` is treated as a decline
/// too, so the card can be retried against the same intent.
pub(crate) fn classify_confirmation(
    status_code: u16,
    body: &str,
) -> Result<ChargeOutcome, StripeError> {
    if status_code == 402 {
        return Ok(ChargeOutcome::Declined {
            message: extract_error_message(body),
        });
    }

    if (200..300).contains(&status_code) {
        let confirmation: PaymentIntentConfirmation = serde_json::from_str(body)?;
        if confirmation.status == "succeeded" {
            return Ok(ChargeOutcome::Succeeded {
                intent_id: confirmation.id,
            });
        }
        return Ok(ChargeOutcome::Declined {
            message: format!("Payment not completed (status: {})", confirmation.status),
        });
    }

    Err(StripeError::ApiError {
        status_code,
        message: extract_error_message(body),
    })
}

fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json_body) => json_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body)
            .to_string(),
        Err(_) => body.to_string(),
    }
}
