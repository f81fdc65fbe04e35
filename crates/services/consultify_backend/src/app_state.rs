// --- File: crates/services/consultify_backend/src/app_state.rs ---
use consultify_common::services::ServiceFactory;
use consultify_config::AppConfig;
use std::sync::Arc;

use crate::service_factory::ConsultifyServiceFactory;

/// Application state that is shared across all routes.
///
/// Holds the configuration loaded at startup and the service factory with
/// the remote clients. Routers receive the pieces they need from here, so
/// tests can swap in a mock factory without touching the wiring in `main`.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,

    /// Service factory for accessing external services.
    pub service_factory: Arc<dyn ServiceFactory>,
}

/// Builder for AppState to provide a cleaner initialization pattern.
///
/// The main application flow uses the simpler `AppState::new` directly; the
/// builder exists so test code can construct an AppState around a mock
/// service factory.
#[allow(dead_code)]
pub struct AppStateBuilder {
    config: Arc<AppConfig>,
    service_factory: Option<Arc<dyn ServiceFactory>>,
}

impl AppStateBuilder {
    /// Create a new AppStateBuilder with the given configuration.
    #[allow(dead_code)]
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            service_factory: None,
        }
    }

    /// Set the service factory.
    #[allow(dead_code)]
    pub fn with_service_factory(mut self, service_factory: Arc<dyn ServiceFactory>) -> Self {
        self.service_factory = Some(service_factory);
        self
    }

    /// Build the AppState.
    #[allow(dead_code)]
    pub fn build(self) -> AppState {
        assert!(self.service_factory.is_some(), "Service factory must be set");

        AppState {
            config: self.config,
            service_factory: self.service_factory.unwrap(),
        }
    }
}

impl AppState {
    /// Create a new AppStateBuilder with the given configuration.
    #[allow(dead_code)]
    pub fn builder(config: Arc<AppConfig>) -> AppStateBuilder {
        AppStateBuilder::new(config)
    }

    /// Create a new AppState with the given configuration.
    /// This is a convenience method that creates a service factory and builds the AppState.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let service_factory = Arc::new(ConsultifyServiceFactory::new(config.clone()).await);

        Self {
            config,
            service_factory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_factory::mock::MockServiceFactory;
    use consultify_config::ServerConfig;

    fn config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8086,
            },
            use_scheduling: false,
            use_payment: false,
            scheduling: None,
            stripe: None,
            booking: None,
        })
    }

    #[tokio::test]
    async fn test_new_without_flags_leaves_services_unwired() {
        let state = AppState::new(config()).await;
        assert!(state.service_factory.scheduling_service().is_none());
        assert!(state.service_factory.payment_provider().is_none());
    }

    #[test]
    fn test_builder_accepts_mock_factory() {
        let state = AppState::builder(config())
            .with_service_factory(Arc::new(MockServiceFactory::new()))
            .build();
        assert_eq!(state.config.server.port, 8086);
        assert!(state.service_factory.scheduling_service().is_none());
    }

    #[test]
    #[should_panic(expected = "Service factory must be set")]
    fn test_builder_requires_service_factory() {
        let _ = AppState::builder(config()).build();
    }
}
