use crate::config::ServerConfig;
use crate::engine::MatchEngine;
use crate::error::ServerResult;
use crate::store::MatchStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Store backend (shared with the engine; exposed so the hosting
    /// application and tests can seed reports)
    pub store: Arc<dyn MatchStore>,

    /// Matching engine (runs are serialized internally)
    pub engine: Arc<MatchEngine>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = config.store_config().build()?;
        let engine = Arc::new(MatchEngine::new(store.clone()));

        Ok(Self {
            config: Arc::new(config),
            store,
            engine,
        })
    }
}
