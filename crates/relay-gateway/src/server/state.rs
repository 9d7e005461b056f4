//! Gateway state
//!
//! Application state shared by every connection.

use crate::router::EventRouter;
use relay_common::AppConfig;
use relay_core::Authenticator;
use std::sync::Arc;

/// Gateway application state
///
/// One router and one authenticator for the whole process.
#[derive(Clone)]
pub struct GatewayState {
    /// Topic router shared by every session
    router: Arc<EventRouter>,
    /// Identity lookup for auth frames
    authenticator: Arc<dyn Authenticator>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        router: Arc<EventRouter>,
        authenticator: Arc<dyn Authenticator>,
        config: AppConfig,
    ) -> Self {
        Self {
            router,
            authenticator,
            config: Arc::new(config),
        }
    }

    /// Get the topic router
    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    /// Get the authenticator
    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("router", &self.router)
            .field("config", &"AppConfig")
            .finish()
    }
}
