//! Store diagnostics: environment report, connectivity check, debug snapshot

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::state::{ApiKeyServiceTrait, AppState};
use crate::api::types::Json;
use crate::config::StoreConfig;
use crate::domain::DomainError;

const NOT_SET: &str = "not set";

#[derive(Debug, Serialize)]
pub struct EnvCheckResponse {
    pub store_url: String,
    pub store_key: String,
    pub env_loaded: bool,
    pub backend: &'static str,
    /// Names only, never values
    pub env_vars: Vec<String>,
}

/// Outcome of a store round trip
#[derive(Debug, Serialize)]
pub struct DbCheckReport {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl DbCheckReport {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectionInfo {
    pub url: String,
    pub has_key: bool,
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub connection: ConnectionInfo,
    pub table_exists: bool,
    pub timestamp: String,
    pub backend: &'static str,
}

/// First and last three characters; anything shorter is hidden entirely
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();

    if chars.len() <= 6 {
        return "...".to_string();
    }

    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Names of the variables that feed configuration, sorted
pub fn config_var_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut relevant: Vec<String> = names
        .filter(|name| {
            name.starts_with("APP__")
                || name.starts_with("SUPABASE_")
                || name.starts_with("NEXT_PUBLIC_SUPABASE_")
        })
        .collect();
    relevant.sort();
    relevant
}

pub fn env_report(store: &StoreConfig, env_vars: Vec<String>) -> EnvCheckResponse {
    EnvCheckResponse {
        store_url: store.url.clone().unwrap_or_else(|| NOT_SET.to_string()),
        store_key: store
            .api_key
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| NOT_SET.to_string()),
        env_loaded: store.is_configured(),
        backend: store.backend.as_str(),
        env_vars,
    }
}

/// Ping the store through the key service
pub async fn check_database(service: &dyn ApiKeyServiceTrait) -> DbCheckReport {
    match service.check_connection().await {
        Ok(()) => {
            info!("Database connection check succeeded");
            DbCheckReport {
                status: "success",
                message: "Database connection succeeded",
                error: None,
                hint: None,
            }
        }
        Err(err) => {
            warn!(error = %err, "Database connection check failed");

            let (error, hint) = match err {
                DomainError::Store(store_err) => {
                    let hint = store_err.hint();
                    (store_err.message, hint)
                }
                other => (other.to_string(), None),
            };

            DbCheckReport {
                status: "error",
                message: "Database connection failed",
                error: Some(error),
                hint,
            }
        }
    }
}

/// GET /env-check
pub async fn env_check(State(state): State<AppState>) -> impl IntoResponse {
    let env_vars = config_var_names(std::env::vars().map(|(name, _)| name));
    Json(env_report(&state.store_config, env_vars))
}

/// GET /check-db
pub async fn check_db(State(state): State<AppState>) -> impl IntoResponse {
    let report = check_database(state.api_key_service.as_ref()).await;

    let status = if report.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(report))
}

/// GET /debug
pub async fn debug_info(State(state): State<AppState>) -> impl IntoResponse {
    let table_exists = state.api_key_service.check_connection().await.is_ok();
    let store = &state.store_config;

    Json(DebugResponse {
        connection: ConnectionInfo {
            url: store.url.clone().unwrap_or_else(|| NOT_SET.to_string()),
            has_key: store.api_key.is_some(),
        },
        table_exists,
        timestamp: Utc::now().to_rfc3339(),
        backend: store.backend.as_str(),
    })
}
