// --- File: crates/consultify_stripe/src/lib.rs ---

pub mod error;
pub mod logic;
pub mod service;

// Re-export for main backend
pub use error::StripeError;
pub use service::StripePaymentProvider;
