//! Application state
//!
//! Shared dependencies for the REST handlers. The gateway context inside
//! holds the same connection registry the service layer broadcasts through.

use confab_common::{AppConfig, JwtService};
use confab_gateway::GatewayContext;
use confab_service::ServiceContext;
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    services: Arc<ServiceContext>,
    gateway: GatewayContext,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state
    pub fn new(services: ServiceContext, gateway: GatewayContext, config: AppConfig) -> Self {
        Self {
            services: Arc::new(services),
            gateway,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn services(&self) -> &ServiceContext {
        &self.services
    }

    /// Get the gateway context
    pub fn gateway(&self) -> &GatewayContext {
        &self.gateway
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &Arc<JwtService> {
        self.services.jwt()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("gateway", &self.gateway)
            .finish()
    }
}
