// Application state module
// Built once at startup and shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::db::{DbBackend, ExternalBinary};

/// Application state
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn DbBackend>,
}

impl AppState {
    /// State backed by the external binary named in the configuration
    pub fn new(config: Config) -> Self {
        let backend = Arc::new(ExternalBinary::from_config(&config.database));
        Self::with_backend(config, backend)
    }

    pub fn with_backend(config: Config, backend: Arc<dyn DbBackend>) -> Self {
        Self { config, backend }
    }
}
