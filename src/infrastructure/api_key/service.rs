//! API Key service
//!
//! Validates and normalizes inputs, then maps each operation onto the store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::api_key::{
    validate_name, ApiKey, ApiKeyChanges, ApiKeyId, ApiKeyStore, ApiKeyType, UsageLimit,
};
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// Input for creating a key
#[derive(Debug, Clone, Default)]
pub struct CreateApiKeyRequest {
    pub name: String,
    /// Unknown or missing labels fall back to development
    pub key_type: Option<String>,
    pub limit_enabled: Option<bool>,
    pub limit: Option<i64>,
}

/// Partial update of a key. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateApiKeyRequest {
    pub name: Option<String>,
    pub key_type: Option<String>,
    pub limit_enabled: Option<bool>,
    /// `Some(None)` is an explicit null
    pub limit: Option<Option<i64>>,
}

impl UpdateApiKeyRequest {
    fn touches_limit(&self) -> bool {
        self.limit_enabled.is_some() || self.limit.is_some()
    }
}

/// API Key service for managing key records
#[derive(Debug)]
pub struct ApiKeyService<S>
where
    S: ApiKeyStore,
{
    store: Arc<S>,
    generator: ApiKeyGenerator,
}

impl<S: ApiKeyStore> ApiKeyService<S> {
    /// Create a new API key service
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            generator: ApiKeyGenerator::new(),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// List all keys, newest first
    pub async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        Ok(self.store.list().await?)
    }

    /// Get a key by ID
    pub async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        Ok(self.store.get(id).await?)
    }

    /// Create a new key with a freshly generated secret
    pub async fn create(&self, request: CreateApiKeyRequest) -> Result<ApiKey, DomainError> {
        let name = validate_name(&request.name)?;
        let key_type = ApiKeyType::or_default(request.key_type.as_deref());
        let usage_limit =
            UsageLimit::resolve(request.limit_enabled.unwrap_or(false), request.limit)?;

        let secret = self.generator.generate();
        let api_key = ApiKey::new(ApiKeyId::generate(), name, secret, key_type, usage_limit);

        info!(
            id = %api_key.id(),
            name = %api_key.name(),
            key_type = %key_type,
            key = %ApiKeyGenerator::mask(api_key.key()),
            "Creating API key"
        );

        let created = self.store.insert(api_key).await?;

        info!(id = %created.id(), "API key created");
        Ok(created)
    }

    /// Update the mutable fields of a key
    pub async fn update(
        &self,
        id: &ApiKeyId,
        request: UpdateApiKeyRequest,
    ) -> Result<ApiKey, DomainError> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let changes = build_changes(&current, &request)?;

        if changes.is_empty() {
            debug!(id = %id, "Empty update, returning current record");
            return Ok(current);
        }

        info!(id = %id, "Updating API key");

        self.store
            .update(id, &changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Delete a key. Deleting an unknown ID succeeds.
    pub async fn delete(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        if self.store.delete(id).await? {
            info!(id = %id, "API key deleted");
        } else {
            debug!(id = %id, "Delete matched no API key");
        }

        Ok(())
    }

    /// Cheap round trip to the store
    pub async fn check_connection(&self) -> Result<(), DomainError> {
        Ok(self.store.ping().await?)
    }
}

fn not_found(id: &ApiKeyId) -> DomainError {
    DomainError::not_found(format!("API key '{}' not found", id))
}

fn build_changes(
    current: &ApiKey,
    request: &UpdateApiKeyRequest,
) -> Result<ApiKeyChanges, DomainError> {
    let name = request.name.as_deref().map(validate_name).transpose()?;

    let key_type = request
        .key_type
        .as_deref()
        .map(str::parse::<ApiKeyType>)
        .transpose()?;

    let usage_limit = if request.touches_limit() {
        let enabled = request.limit_enabled.unwrap_or(current.limit_enabled());
        let limit = request.limit.unwrap_or(current.limit());
        Some(UsageLimit::resolve(enabled, limit)?)
    } else {
        None
    };

    Ok(ApiKeyChanges {
        name,
        key_type,
        usage_limit,
    })
}
