// --- File: crates/consultify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Scheduling Backend Config ---
// Holds non-secret settings for the upstream availability/booking service.
// API key (if any) loaded directly from env var: SCHEDULING_API_KEY
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Base URL of the availability/booking backend, no trailing slash.
    pub base_url: String,
    /// IANA timezone used to bucket slot start times into calendar dates.
    pub timezone: Option<String>,
    /// How far ahead slots may be booked, in days.
    pub horizon_days: Option<i64>,
}

impl SchedulingConfig {
    /// Booking look-ahead window applied when no override is configured.
    pub const DEFAULT_HORIZON_DAYS: i64 = 60;

    pub fn horizon_days(&self) -> i64 {
        self.horizon_days.unwrap_or(Self::DEFAULT_HORIZON_DAYS)
    }
}

// --- Stripe Config ---
// Holds non-secret Stripe config. Secret key loaded directly from env var: STRIPE_SECRET_KEY
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    /// Provider API base, overridable for test doubles.
    pub api_base_url: Option<String>,
    pub default_currency: Option<String>,
}

impl StripeConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "https://api.stripe.com";

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_API_BASE_URL)
    }
}

// --- Booking Flow Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingConfig {
    /// Currency for payment intents, lowercase ISO code. Falls back to
    /// stripe.default_currency, then "usd".
    pub currency: Option<String>,
    /// Upper bound on concurrently open booking sessions.
    pub max_open_sessions: Option<usize>,
}

impl BookingConfig {
    /// Currency applied when neither booking nor stripe config names one.
    pub const DEFAULT_CURRENCY: &'static str = "usd";
    /// Open-session cap applied when no override is configured.
    pub const DEFAULT_MAX_OPEN_SESSIONS: usize = 512;

    pub fn max_open_sessions(&self) -> usize {
        self.max_open_sessions
            .unwrap_or(Self::DEFAULT_MAX_OPEN_SESSIONS)
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_scheduling: bool,
    #[serde(default)]
    pub use_payment: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub scheduling: Option<SchedulingConfig>,
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
    #[serde(default)]
    pub booking: Option<BookingConfig>,
}
