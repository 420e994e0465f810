//! API key resource endpoints
//!
//! Handlers only parse the path and body, call the key service and render
//! the dual-alias view. Inbound bodies accept `limit_enabled`,
//! `limitEnabled` or both (snake_case wins); outbound records carry both
//! spellings of the aliased fields.

use axum::extract::{Path, State};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{ApiKey, ApiKeyId, DomainError};
use crate::infrastructure::api_key::{CreateApiKeyRequest, UpdateApiKeyRequest};

/// Record as rendered for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiKeyView {
    pub id: String,
    pub name: String,
    pub key: String,
    #[serde(rename = "type")]
    pub key_type: String,
    pub limit_enabled: bool,
    #[serde(rename = "limitEnabled")]
    pub limit_enabled_alias: bool,
    pub limit: Option<i64>,
    pub created_at: String,
    #[serde(rename = "createdAt")]
    pub created_at_alias: String,
}

impl From<&ApiKey> for ApiKeyView {
    fn from(key: &ApiKey) -> Self {
        let created_at = key.created_at().to_rfc3339();

        Self {
            id: key.id().to_string(),
            name: key.name().to_string(),
            key: key.key().to_string(),
            key_type: key.key_type().to_string(),
            limit_enabled: key.limit_enabled(),
            limit_enabled_alias: key.limit_enabled(),
            limit: key.limit(),
            created_at_alias: created_at.clone(),
            created_at,
        }
    }
}

/// Body of `POST /keys`. Unknown fields such as `key` or `id` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateKeyBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub key_type: Option<String>,
    #[serde(default)]
    pub limit_enabled: Option<bool>,
    #[serde(default, rename = "limitEnabled")]
    pub limit_enabled_alias: Option<bool>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl From<CreateKeyBody> for CreateApiKeyRequest {
    fn from(body: CreateKeyBody) -> Self {
        Self {
            name: body.name.unwrap_or_default(),
            key_type: body.key_type,
            limit_enabled: body.limit_enabled.or(body.limit_enabled_alias),
            limit: body.limit,
        }
    }
}

/// Body of `PUT`/`PATCH /keys/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateKeyBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub key_type: Option<String>,
    #[serde(default)]
    pub limit_enabled: Option<bool>,
    #[serde(default, rename = "limitEnabled")]
    pub limit_enabled_alias: Option<bool>,
    /// Absent leaves the limit alone, `null` clears it
    #[serde(default, deserialize_with = "present_or_null")]
    pub limit: Option<Option<i64>>,
}

impl From<UpdateKeyBody> for UpdateApiKeyRequest {
    fn from(body: UpdateKeyBody) -> Self {
        Self {
            name: body.name,
            key_type: body.key_type,
            limit_enabled: body.limit_enabled.or(body.limit_enabled_alias),
            limit: body.limit,
        }
    }
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteKeyResponse {
    pub success: bool,
}

fn parse_id(raw: &str) -> Result<ApiKeyId, ApiError> {
    ApiKeyId::parse(raw).map_err(|e| ApiError::from(DomainError::from(e)))
}

/// GET /keys
pub async fn list_keys(State(state): State<AppState>) -> Result<Json<Vec<ApiKeyView>>, ApiError> {
    let keys = state.api_key_service.list().await?;
    debug!(count = keys.len(), "Listed API keys");

    Ok(Json(keys.iter().map(ApiKeyView::from).collect()))
}

/// GET /keys/{id}
pub async fn get_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiKeyView>, ApiError> {
    let id = parse_id(&id)?;

    let key = state
        .api_key_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("API key '{}' not found", id)))?;

    Ok(Json(ApiKeyView::from(&key)))
}

/// POST /keys
pub async fn create_key(
    State(state): State<AppState>,
    Json(body): Json<CreateKeyBody>,
) -> Result<Json<ApiKeyView>, ApiError> {
    let created = state.api_key_service.create(body.into()).await?;
    Ok(Json(ApiKeyView::from(&created)))
}

/// PUT or PATCH /keys/{id}
pub async fn update_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateKeyBody>,
) -> Result<Json<ApiKeyView>, ApiError> {
    let id = parse_id(&id)?;

    let updated = state.api_key_service.update(&id, body.into()).await?;
    Ok(Json(ApiKeyView::from(&updated)))
}

/// DELETE /keys/{id}
pub async fn delete_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteKeyResponse>, ApiError> {
    let id = parse_id(&id)?;

    state.api_key_service.delete(&id).await?;
    Ok(Json(DeleteKeyResponse { success: true }))
}
