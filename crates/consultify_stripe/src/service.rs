// --- File: crates/consultify_stripe/src/service.rs ---
use std::sync::Arc;

use crate::error::StripeError;
use crate::logic::{confirm_payment_intent, create_payment_intent, CreatePaymentIntentRequest};
use consultify_common::services::{
    BoxFuture, CardDetails, ChargeOutcome, PaymentIntent, PaymentProvider,
};
use consultify_config::AppConfig;

/// Stripe-backed payment provider implementation
pub struct StripePaymentProvider {
    config: Arc<AppConfig>,
}

impl StripePaymentProvider {
    /// Create a new Stripe payment provider
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

impl PaymentProvider for StripePaymentProvider {
    type Error = StripeError;

    fn create_intent(
        &self,
        booking_id: i64,
        amount_cents: i64,
        currency: &str,
    ) -> BoxFuture<'_, PaymentIntent, Self::Error> {
        // Clone the values to avoid lifetime issues
        let currency = currency.to_string();

        Box::pin(async move {
            // Intents are minted by the booking backend, keyed to the booking.
            let scheduling_config = self
                .config
                .scheduling
                .as_ref()
                .ok_or(StripeError::ConfigError)?;

            let request = CreatePaymentIntentRequest {
                booking_id,
                amount_cents,
                currency,
            };
            let response = create_payment_intent(&scheduling_config.base_url, &request).await?;

            Ok(PaymentIntent {
                client_secret: response.client_secret,
            })
        })
    }

    fn confirm_charge(
        &self,
        intent: &PaymentIntent,
        card: &CardDetails,
    ) -> BoxFuture<'_, ChargeOutcome, Self::Error> {
        // Clone the values to avoid lifetime issues
        let intent = intent.clone();
        let card = card.clone();

        Box::pin(async move {
            let stripe_config = self.config.stripe.as_ref().ok_or(StripeError::ConfigError)?;

            confirm_payment_intent(stripe_config, &intent, &card).await
        })
    }
}
