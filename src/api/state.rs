//! Application state for shared services

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::domain::api_key::{ApiKeyId, ApiKeyStore};
use crate::domain::{ApiKey, DomainError};
use crate::infrastructure::allow_list::AllowList;
use crate::infrastructure::api_key::{ApiKeyService, CreateApiKeyRequest, UpdateApiKeyRequest};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    /// Store settings, reported by the diagnostics endpoints
    pub store_config: Arc<StoreConfig>,
    pub allow_list: Arc<AllowList>,
}

impl AppState {
    pub fn new(
        api_key_service: Arc<dyn ApiKeyServiceTrait>,
        store_config: StoreConfig,
        allow_list: AllowList,
    ) -> Self {
        Self {
            api_key_service,
            store_config: Arc::new(store_config),
            allow_list: Arc::new(allow_list),
        }
    }
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<ApiKey>, DomainError>;
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;
    async fn create(&self, request: CreateApiKeyRequest) -> Result<ApiKey, DomainError>;
    async fn update(
        &self,
        id: &ApiKeyId,
        request: UpdateApiKeyRequest,
    ) -> Result<ApiKey, DomainError>;
    async fn delete(&self, id: &ApiKeyId) -> Result<(), DomainError>;
    async fn check_connection(&self) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<S: ApiKeyStore + 'static> ApiKeyServiceTrait for ApiKeyService<S> {
    async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list(self).await
    }

    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        ApiKeyService::get(self, id).await
    }

    async fn create(&self, request: CreateApiKeyRequest) -> Result<ApiKey, DomainError> {
        ApiKeyService::create(self, request).await
    }

    async fn update(
        &self,
        id: &ApiKeyId,
        request: UpdateApiKeyRequest,
    ) -> Result<ApiKey, DomainError> {
        ApiKeyService::update(self, id, request).await
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        ApiKeyService::delete(self, id).await
    }

    async fn check_connection(&self) -> Result<(), DomainError> {
        ApiKeyService::check_connection(self).await
    }
}
