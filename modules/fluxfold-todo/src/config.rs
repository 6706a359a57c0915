use std::path::PathBuf;

use fluxfold_engine::StoreConfig;

/// Demo configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct TodoConfig {
    /// JSON file holding the list. In-memory storage when unset.
    pub storage_path: Option<PathBuf>,
    pub store: StoreConfig,
}

impl TodoConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            storage_path: std::env::var("FLUXFOLD_TODO_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            store: StoreConfig::from_env(),
        };

        config.log_keys();
        config
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  FLUXFOLD_TODO_PATH: {}",
            self.storage_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set, in-memory>".to_string())
        );
        tracing::info!("  FLUXFOLD_STORE_NAME: {}", self.store.name);
        tracing::info!("  FLUXFOLD_LOG: {}", self.store.log);
    }
}
