//! Application state management

use goalpost::core::Backend;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Goalpost backend (store plus managers)
    pub backend: Backend,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(backend: Backend, config: ServerConfig) -> Self {
        Self { backend, config }
    }
}
