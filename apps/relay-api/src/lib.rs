pub mod config;
pub mod gateway;
pub mod routes;

use std::sync::Arc;

use config::Config;
use gateway::cache::LatestFocus;
use gateway::fanout::RelayHub;
use gateway::registry::ConnectionRegistry;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<ConnectionRegistry>,
    pub cache: Arc<LatestFocus>,
    pub hub: Arc<RelayHub>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let cache = Arc::new(LatestFocus::new());
        let hub = Arc::new(RelayHub::new(registry.clone(), cache.clone()));
        Self {
            config: Arc::new(config),
            registry,
            cache,
            hub,
        }
    }
}
