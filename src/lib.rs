//! API Key Dashboard
//!
//! Backend for a dashboard that manages API keys kept in a hosted Postgres
//! table:
//! - CRUD over key records through a PostgREST store (or in memory)
//! - Diagnostics for the store connection
//! - A static allow-list check behind `POST /protected`

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{ApiKeyServiceTrait, AppState};
use config::StoreBackend;
use infrastructure::allow_list::AllowList;
use infrastructure::api_key::{
    ApiKeyService, InMemoryApiKeyStore, PostgrestApiKeyStore, UnconfiguredApiKeyStore,
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key_service = create_api_key_service(config)?;
    let allow_list = AllowList::new(config.protected.allowed_keys.clone());

    if allow_list.is_empty() {
        warn!("Protected allow-list is empty; every token will be rejected");
    }

    Ok(AppState::new(
        api_key_service,
        config.store.clone(),
        allow_list,
    ))
}

fn create_api_key_service(config: &AppConfig) -> anyhow::Result<Arc<dyn ApiKeyServiceTrait>> {
    let store = &config.store;

    let service: Arc<dyn ApiKeyServiceTrait> = match store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory key store");
            Arc::new(ApiKeyService::new(Arc::new(InMemoryApiKeyStore::new())))
        }
        StoreBackend::Postgrest => match (store.effective_url(), store.effective_api_key()) {
            (Some(url), Some(api_key)) => {
                let postgrest =
                    PostgrestApiKeyStore::new(url, api_key, &store.table, store.timeout())
                        .map_err(|e| anyhow::anyhow!("Failed to create key store: {}", e))?;

                info!(endpoint = %postgrest.endpoint(), "Using PostgREST key store");
                Arc::new(ApiKeyService::new(Arc::new(postgrest)))
            }
            _ => {
                warn!("Store URL or API key not configured; key operations will fail");
                Arc::new(ApiKeyService::new(Arc::new(UnconfiguredApiKeyStore)))
            }
        },
    };

    Ok(service)
}
