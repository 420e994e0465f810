//! In-memory API key store, for local development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_key::{ApiKey, ApiKeyChanges, ApiKeyId, ApiKeyStore};
use crate::domain::StoreError;

/// In-memory implementation of ApiKeyStore
#[derive(Debug, Default)]
pub struct InMemoryApiKeyStore {
    keys: Arc<RwLock<HashMap<ApiKeyId, ApiKey>>>,
}

impl InMemoryApiKeyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records
    pub fn with_keys(keys: Vec<ApiKey>) -> Self {
        let keys = keys.into_iter().map(|k| (*k.id(), k)).collect();

        Self {
            keys: Arc::new(RwLock::new(keys)),
        }
    }
}

#[async_trait]
impl ApiKeyStore for InMemoryApiKeyStore {
    async fn list(&self) -> Result<Vec<ApiKey>, StoreError> {
        let keys = self.keys.read().await;
        let mut all: Vec<ApiKey> = keys.values().cloned().collect();
        all.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(all)
    }

    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, StoreError> {
        let keys = self.keys.read().await;
        Ok(keys.get(id).cloned())
    }

    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, StoreError> {
        let mut keys = self.keys.write().await;

        if keys.contains_key(api_key.id()) {
            return Err(StoreError::new(format!(
                "duplicate key value violates unique constraint: id {}",
                api_key.id()
            ))
            .with_code("23505"));
        }

        keys.insert(*api_key.id(), api_key.clone());
        Ok(api_key)
    }

    async fn update(
        &self,
        id: &ApiKeyId,
        changes: &ApiKeyChanges,
    ) -> Result<Option<ApiKey>, StoreError> {
        let mut keys = self.keys.write().await;

        Ok(keys.get_mut(id).map(|key| {
            key.apply(changes);
            key.clone()
        }))
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, StoreError> {
        let mut keys = self.keys.write().await;
        Ok(keys.remove(id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
