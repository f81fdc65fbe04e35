// --- File: crates/consultify_common/src/features.rs ---
//! Runtime feature-flag handling.
//!
//! A capability is active only when its `use_*` flag is set AND its config
//! section is present. Compile-time gating is limited to the `openapi`
//! feature; everything else is decided from configuration at startup.

use consultify_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the scheduling backend integration is enabled at runtime.
pub fn is_scheduling_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_scheduling, config.scheduling.as_ref())
}

/// Check if the payment provider integration is enabled at runtime.
pub fn is_payment_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_payment, config.stripe.as_ref())
}
