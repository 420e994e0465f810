//! Store used when the PostgREST backend is selected but no URL or key is set

use async_trait::async_trait;

use crate::domain::api_key::{ApiKey, ApiKeyChanges, ApiKeyId, ApiKeyStore};
use crate::domain::StoreError;

const HINT: &str = "Set SUPABASE_URL and SUPABASE_ANON_KEY (or their NEXT_PUBLIC_ forms, or APP__STORE__URL and APP__STORE__API_KEY).";

/// Fails every call without touching the network
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredApiKeyStore;

impl UnconfiguredApiKeyStore {
    fn error() -> StoreError {
        StoreError::new("Store URL or API key is not configured").with_hint(HINT)
    }
}

#[async_trait]
impl ApiKeyStore for UnconfiguredApiKeyStore {
    async fn list(&self) -> Result<Vec<ApiKey>, StoreError> {
        Err(Self::error())
    }

    async fn get(&self, _id: &ApiKeyId) -> Result<Option<ApiKey>, StoreError> {
        Err(Self::error())
    }

    async fn insert(&self, _api_key: ApiKey) -> Result<ApiKey, StoreError> {
        Err(Self::error())
    }

    async fn update(
        &self,
        _id: &ApiKeyId,
        _changes: &ApiKeyChanges,
    ) -> Result<Option<ApiKey>, StoreError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: &ApiKeyId) -> Result<bool, StoreError> {
        Err(Self::error())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(Self::error())
    }
}
