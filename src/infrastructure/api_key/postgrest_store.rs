//! PostgREST-backed API key store
//!
//! Talks to the REST interface a hosted Postgres (e.g. Supabase) exposes for
//! a table: `{base_url}/rest/v1/{table}`, authenticated with the project's
//! API key sent both as `apikey` and as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::api_key::{ApiKey, ApiKeyChanges, ApiKeyId, ApiKeyStore};
use crate::domain::StoreError;

const REST_PATH: &str = "rest/v1/";

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Store implementation over PostgREST
#[derive(Debug, Clone)]
pub struct PostgrestApiKeyStore {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl PostgrestApiKeyStore {
    /// Build a store for `table` under the given project URL
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let endpoint = build_endpoint(base_url, table)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn url_with(&self, params: &[(&str, String)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        url
    }

    fn id_filter(id: &ApiKeyId) -> (&'static str, String) {
        ("id", format!("eq.{}", id))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Request to store failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::new(format!("Failed to parse store response: {}", e)))
    }
}

fn build_endpoint(base_url: &str, table: &str) -> Result<Url, StoreError> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    Url::parse(&base)
        .and_then(|url| url.join(REST_PATH))
        .and_then(|url| url.join(table))
        .map_err(|e| StoreError::new(format!("Invalid store URL '{}': {}", base_url, e)))
}

fn error_from_body(status: StatusCode, body: &str) -> StoreError {
    let parsed = serde_json::from_str::<PostgrestErrorBody>(body)
        .ok()
        .filter(|e| e.message.is_some());

    let Some(parsed) = parsed else {
        return StoreError::new(format!("HTTP {}: {}", status, body));
    };

    let mut error = StoreError::new(parsed.message.unwrap_or_default());

    if let Some(code) = parsed.code {
        error = error.with_code(code);
    }
    if let Some(details) = parsed.details {
        error = error.with_details(details);
    }
    if let Some(hint) = parsed.hint {
        error = error.with_hint(hint);
    }

    error
}

#[async_trait]
impl ApiKeyStore for PostgrestApiKeyStore {
    async fn list(&self) -> Result<Vec<ApiKey>, StoreError> {
        let url = self.url_with(&[
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ]);

        self.send(self.request(Method::GET, url)).await
    }

    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, StoreError> {
        let url = self.url_with(&[("select", "*".to_string()), Self::id_filter(id)]);

        let rows: Vec<ApiKey> = self.send(self.request(Method::GET, url)).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, StoreError> {
        let request = self
            .request(Method::POST, self.endpoint.clone())
            .header("Prefer", "return=representation")
            .json(&[&api_key]);

        let rows: Vec<ApiKey> = self.send(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::new("Store returned no row for the inserted key"))
    }

    async fn update(
        &self,
        id: &ApiKeyId,
        changes: &ApiKeyChanges,
    ) -> Result<Option<ApiKey>, StoreError> {
        let url = self.url_with(&[Self::id_filter(id)]);
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&changes.to_row());

        let rows: Vec<ApiKey> = self.send(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, StoreError> {
        let url = self.url_with(&[Self::id_filter(id)]);
        let request = self
            .request(Method::DELETE, url)
            .header("Prefer", "return=representation");

        let rows: Vec<Value> = self.send(request).await?;
        debug!(id = %id, removed = rows.len(), "Store delete completed");
        Ok(!rows.is_empty())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let url = self.url_with(&[("select", "id".to_string()), ("limit", "1".to_string())]);

        let _: Vec<Value> = self.send(self.request(Method::GET, url)).await?;
        Ok(())
    }
}
