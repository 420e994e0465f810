//! API Key store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{ApiKey, ApiKeyChanges, ApiKeyId};
use crate::domain::StoreError;

/// Access to the table of key records held by the hosted database
///
/// Implementations do no validation; they persist what they are given and
/// report the store's own failures as [`StoreError`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// All records, newest first
    async fn list(&self) -> Result<Vec<ApiKey>, StoreError>;

    /// A single record by ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, StoreError>;

    /// Insert a record and return it as stored
    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, StoreError>;

    /// Update a record by ID, returning it as stored.
    /// `None` means no row matched the ID.
    async fn update(
        &self,
        id: &ApiKeyId,
        changes: &ApiKeyChanges,
    ) -> Result<Option<ApiKey>, StoreError>;

    /// Delete a record by ID, returning whether a row was removed
    async fn delete(&self, id: &ApiKeyId) -> Result<bool, StoreError>;

    /// Cheap round trip confirming the table is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
