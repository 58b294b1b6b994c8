use crate::{
    config::AppConfig,
    error::AppResult,
    service::ServiceRegistry,
    storage::StoreManager,
};

/// Everything the handlers need, built once in `main` and cloned into each
/// request via axum state. No globals; tests build their own instance.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: StoreManager,
    pub services: ServiceRegistry,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        info!("Initializing AppState");

        let store = StoreManager::new(&config.store);
        let services = ServiceRegistry::new(&config, store.clone())?;

        Ok(Self {
            config,
            store,
            services,
        })
    }
}
