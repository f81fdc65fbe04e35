// --- File: crates/services/consultify_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! This module provides an implementation of the ServiceFactory trait for the
//! backend service. Remote clients are built once at startup, gated on the
//! runtime feature flags, and handed out as `BoxedError` trait objects so the
//! booking engine never sees a concrete client type.
use chrono::NaiveDate;
use consultify_common::is_feature_enabled;
use consultify_common::services::{
    Booking, BookingAttempt, BookingRequest, BoxFuture, BoxedError, CardDetails, ChargeOutcome,
    PaymentIntent, PaymentProvider, SchedulingService, ServiceFactory, Slot,
};
use consultify_config::AppConfig;
use consultify_scheduling::service::SchedulingApiService;
use consultify_stripe::service::StripePaymentProvider;
use std::sync::Arc;
use tracing::info;

/// Service factory implementation.
///
/// This struct implements the `ServiceFactory` trait, providing access to the
/// external services used by the application. The factory initializes services
/// based on the application configuration and runtime flags, making them
/// available through the trait methods. A disabled or unconfigured capability
/// stays `None`, and the routers it would back are simply not mounted.
pub struct ConsultifyServiceFactory {
    /// Configuration the factory was created from.
    ///
    /// Kept after initialization so later service additions have the full
    /// startup context available without changing the constructor.
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    scheduling_service: Option<Arc<dyn SchedulingService<Error = BoxedError>>>,
    payment_provider: Option<Arc<dyn PaymentProvider<Error = BoxedError>>>,
}

impl ConsultifyServiceFactory {
    /// Create a new service factory.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let mut factory = Self {
            config: config.clone(),
            scheduling_service: None,
            payment_provider: None,
        };

        // Initialize the scheduling backend client if enabled
        if is_feature_enabled(&config, config.use_scheduling, config.scheduling.as_ref()) {
            info!("ℹ️ Initializing scheduling backend client...");

            // Create a wrapper that converts SchedulingError to BoxedError
            struct BoxedSchedulingService {
                inner: SchedulingApiService,
            }

            impl SchedulingService for BoxedSchedulingService {
                type Error = BoxedError;

                fn list_available_slots(&self) -> BoxFuture<'_, Vec<Slot>, Self::Error> {
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .list_available_slots()
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }

                fn list_slots_for_date(
                    &self,
                    date: NaiveDate,
                ) -> BoxFuture<'_, Vec<Slot>, Self::Error> {
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .list_slots_for_date(date)
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }

                fn create_booking(
                    &self,
                    request: BookingRequest,
                ) -> BoxFuture<'_, BookingAttempt, Self::Error> {
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .create_booking(request)
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }

                fn confirm_payment(
                    &self,
                    payment_intent_id: &str,
                ) -> BoxFuture<'_, Booking, Self::Error> {
                    let payment_intent_id = payment_intent_id.to_string();
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .confirm_payment(&payment_intent_id)
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }
            }

            let service = SchedulingApiService::new(config.scheduling.as_ref().unwrap());
            let boxed_service = BoxedSchedulingService { inner: service };
            factory.scheduling_service = Some(Arc::new(boxed_service));
            info!("✅ Scheduling backend client initialized.");
        } else {
            info!("ℹ️ Scheduling disabled via runtime config or missing scheduling config section.");
        }

        // Initialize the Stripe payment provider if enabled
        if is_feature_enabled(&config, config.use_payment, config.stripe.as_ref()) {
            info!("ℹ️ Initializing Stripe payment provider...");

            // Create a wrapper that converts StripeError to BoxedError
            struct BoxedPaymentProvider {
                inner: StripePaymentProvider,
            }

            impl PaymentProvider for BoxedPaymentProvider {
                type Error = BoxedError;

                fn create_intent(
                    &self,
                    booking_id: i64,
                    amount_cents: i64,
                    currency: &str,
                ) -> BoxFuture<'_, PaymentIntent, Self::Error> {
                    let currency = currency.to_string();
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .create_intent(booking_id, amount_cents, &currency)
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }

                fn confirm_charge(
                    &self,
                    intent: &PaymentIntent,
                    card: &CardDetails,
                ) -> BoxFuture<'_, ChargeOutcome, Self::Error> {
                    let intent = intent.clone();
                    let card = card.clone();
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .confirm_charge(&intent, &card)
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }
            }

            let provider = StripePaymentProvider::new(config.clone());
            let boxed_provider = BoxedPaymentProvider { inner: provider };
            factory.payment_provider = Some(Arc::new(boxed_provider));
            info!("✅ Stripe payment provider initialized.");
        }

        factory
    }
}

impl ServiceFactory for ConsultifyServiceFactory {
    fn scheduling_service(&self) -> Option<Arc<dyn SchedulingService<Error = BoxedError>>> {
        self.scheduling_service.clone()
    }

    fn payment_provider(&self) -> Option<Arc<dyn PaymentProvider<Error = BoxedError>>> {
        self.payment_provider.clone()
    }
}
