//! API Key infrastructure implementations
//!
//! Key generation, the key service and the store adapters.

mod generator;
mod in_memory_store;
mod postgrest_store;
mod service;
mod unconfigured_store;

pub use generator::{constant_time_compare, ApiKeyGenerator};
pub use in_memory_store::InMemoryApiKeyStore;
pub use postgrest_store::PostgrestApiKeyStore;
pub use service::{ApiKeyService, CreateApiKeyRequest, UpdateApiKeyRequest};
pub use unconfigured_store::UnconfiguredApiKeyStore;
