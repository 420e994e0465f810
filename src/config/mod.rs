//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, LegacyStoreEnv, LogFormat, LoggingConfig, ProtectedConfig, ServerConfig,
    StoreBackend, StoreConfig, PUBLIC_SUPABASE_KEY_VAR, PUBLIC_SUPABASE_URL_VAR,
    SUPABASE_KEY_VAR, SUPABASE_URL_VAR,
};
