//! API Key domain
//!
//! Domain types and the store trait for API key records: the entity,
//! its usage limit, validation rules and the changes accepted on update.

mod entity;
mod store;
mod validation;

pub use entity::{ApiKey, ApiKeyChanges, ApiKeyId, ApiKeyType, UsageLimit};
#[cfg(test)]
pub use store::MockApiKeyStore;
pub use store::ApiKeyStore;
pub use validation::{validate_limit, validate_name, ApiKeyValidationError};
