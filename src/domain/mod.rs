//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;

pub use api_key::{
    ApiKey, ApiKeyChanges, ApiKeyId, ApiKeyStore, ApiKeyType, ApiKeyValidationError, UsageLimit,
};
pub use error::{DomainError, StoreError};
