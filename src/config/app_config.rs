use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::infrastructure::allow_list::DEFAULT_ALLOWED_TOKENS;

/// Legacy variable names still honoured for the store connection
pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "SUPABASE_ANON_KEY";
/// Client-side spellings, read when the plain names are unset
pub const PUBLIC_SUPABASE_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const PUBLIC_SUPABASE_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";

const PLACEHOLDER_URLS: [&str; 2] = ["https://example.supabase.co", "https://your-project.supabase.co"];
const PLACEHOLDER_KEYS: [&str; 2] = ["example-key", "your-anon-key"];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub protected: ProtectedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which store adapter backs the key service
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Postgrest,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgrest => "postgrest",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProtectedConfig {
    pub allowed_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: None,
            api_key: None,
            table: "api_keys".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for ProtectedConfig {
    fn default() -> Self {
        Self {
            allowed_keys: DEFAULT_ALLOWED_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl StoreConfig {
    /// URL if set to something other than a placeholder
    pub fn effective_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty() && !PLACEHOLDER_URLS.contains(u))
    }

    /// Key if set to something other than a placeholder
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !PLACEHOLDER_KEYS.contains(k))
    }

    pub fn is_configured(&self) -> bool {
        self.effective_url().is_some() && self.effective_api_key().is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Values of the legacy store variables, read once from the environment
#[derive(Debug, Clone, Default)]
pub struct LegacyStoreEnv {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl LegacyStoreEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve both values through `lookup`; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            url: var(SUPABASE_URL_VAR).or_else(|| var(PUBLIC_SUPABASE_URL_VAR)),
            api_key: var(SUPABASE_KEY_VAR).or_else(|| var(PUBLIC_SUPABASE_KEY_VAR)),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("protected.allowed_keys"),
            );

        Self::from_builder(builder, LegacyStoreEnv::from_env())
    }

    /// Build from prepared sources; legacy variables override the store section
    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
        legacy: LegacyStoreEnv,
    ) -> Result<Self, ConfigError> {
        let config = builder
            .set_override_option("store.url", legacy.url)?
            .set_override_option("store.api_key", legacy.api_key)?
            .build()?;

        config.try_deserialize()
    }
}
