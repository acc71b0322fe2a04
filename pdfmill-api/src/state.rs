//! Shared, read-only application state.

use crate::config::AppConfig;
use crate::registry::ToolRegistry;
use crate::storage::Storage;

/// Built once in `main` and shared behind an `Arc`; nothing in here is
/// mutated after startup.
pub struct AppState {
    pub config: AppConfig,
    pub registry: ToolRegistry,
    pub storage: Storage,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let storage = Storage::new(&config);
        Self {
            config,
            registry: ToolRegistry::new(),
            storage,
        }
    }
}
