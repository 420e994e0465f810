//! API Key entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::validation::{validate_limit, ApiKeyValidationError};

/// API Key identifier - a UUID assigned at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(Uuid);

impl ApiKeyId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from outside (path segment, store row)
    pub fn parse(id: &str) -> Result<Self, ApiKeyValidationError> {
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|_| ApiKeyValidationError::InvalidId(id.to_string()))
    }
}

impl FromStr for ApiKeyId {
    type Err = ApiKeyValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment label of a key. Cosmetic only: no rate is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ApiKeyType {
    Production,
    #[default]
    Development,
}

impl ApiKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }

    /// Strict parse of a known label
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Some(Self::Production),
            "development" => Some(Self::Development),
            _ => None,
        }
    }

    /// Lenient parse: missing or unrecognised labels fall back to development
    pub fn or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }
}

impl FromStr for ApiKeyType {
    type Err = ApiKeyValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ApiKeyValidationError::UnknownType(s.to_string()))
    }
}

impl From<String> for ApiKeyType {
    fn from(value: String) -> Self {
        Self::or_default(Some(&value))
    }
}

impl std::fmt::Display for ApiKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage ceiling of a key
///
/// Stored as the `limit_enabled` / `limit` column pair; this type keeps the
/// two in step so that a limit exists exactly when the flag is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageLimit {
    #[default]
    Disabled,
    Enabled(i64),
}

impl UsageLimit {
    /// Combine a flag and an optional value into a usage limit.
    ///
    /// A disabled flag discards whatever value was supplied.
    pub fn resolve(enabled: bool, limit: Option<i64>) -> Result<Self, ApiKeyValidationError> {
        if !enabled {
            return Ok(Self::Disabled);
        }

        let limit = limit.ok_or(ApiKeyValidationError::MissingLimit)?;
        Ok(Self::Enabled(validate_limit(limit)?))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Self::Enabled(limit) => Some(*limit),
            Self::Disabled => None,
        }
    }
}

/// API Key entity, in the canonical (stored) field naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    id: ApiKeyId,
    name: String,
    /// The bearer secret, generated once
    key: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    key_type: ApiKeyType,
    #[serde(default, deserialize_with = "null_as_default")]
    limit_enabled: bool,
    #[serde(default)]
    limit: Option<i64>,
    created_at: DateTime<Utc>,
}

/// Nullable columns with a database default read as that default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ApiKey {
    /// Create a new API key record stamped with the current time
    pub fn new(
        id: ApiKeyId,
        name: impl Into<String>,
        key: impl Into<String>,
        key_type: ApiKeyType,
        usage_limit: UsageLimit,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            key: key.into(),
            key_type,
            limit_enabled: usage_limit.is_enabled(),
            limit: usage_limit.value(),
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_type(&self) -> ApiKeyType {
        self.key_type
    }

    pub fn limit_enabled(&self) -> bool {
        self.limit_enabled
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply mutable-field changes. `id`, `key` and `created_at` are untouched.
    pub fn apply(&mut self, changes: &ApiKeyChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }

        if let Some(key_type) = changes.key_type {
            self.key_type = key_type;
        }

        if let Some(usage_limit) = changes.usage_limit {
            self.limit_enabled = usage_limit.is_enabled();
            self.limit = usage_limit.value();
        }
    }
}

/// Changes to the mutable fields of a key, already validated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiKeyChanges {
    pub name: Option<String>,
    pub key_type: Option<ApiKeyType>,
    /// Written as the `limit_enabled` / `limit` pair, always together
    pub usage_limit: Option<UsageLimit>,
}

impl ApiKeyChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.key_type.is_none() && self.usage_limit.is_none()
    }

    /// Row fragment in stored column naming
    pub fn to_row(&self) -> Value {
        let mut row = Map::new();

        if let Some(name) = &self.name {
            row.insert("name".to_string(), Value::from(name.as_str()));
        }

        if let Some(key_type) = self.key_type {
            row.insert("type".to_string(), Value::from(key_type.as_str()));
        }

        if let Some(usage_limit) = self.usage_limit {
            row.insert(
                "limit_enabled".to_string(),
                Value::from(usage_limit.is_enabled()),
            );
            row.insert(
                "limit".to_string(),
                usage_limit.value().map(Value::from).unwrap_or(Value::Null),
            );
        }

        Value::Object(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_api_key(name: &str, usage_limit: UsageLimit) -> ApiKey {
        ApiKey::new(
            ApiKeyId::generate(),
            name,
            "0123456789abcdef0123456789abcdef",
            ApiKeyType::Production,
            usage_limit,
        )
    }

    #[test]
    fn test_api_key_id_parse() {
        let id = ApiKeyId::generate();
        assert_eq!(ApiKeyId::parse(&id.to_string()).unwrap(), id);
        assert!(ApiKeyId::parse("not-a-uuid").is_err());
        assert!(ApiKeyId::parse("").is_err());
    }

    #[test]
    fn test_key_type_parsing() {
        assert_eq!(ApiKeyType::parse("production"), Some(ApiKeyType::Production));
        assert_eq!(ApiKeyType::parse("Development"), Some(ApiKeyType::Development));
        assert_eq!(ApiKeyType::parse("dev"), None);

        assert_eq!(ApiKeyType::or_default(None), ApiKeyType::Development);
        assert_eq!(ApiKeyType::or_default(Some("bogus")), ApiKeyType::Development);
        assert_eq!(
            ApiKeyType::or_default(Some("production")),
            ApiKeyType::Production
        );

        assert!("staging".parse::<ApiKeyType>().is_err());
    }

    #[test]
    fn test_key_type_serde() {
        assert_eq!(
            serde_json::to_string(&ApiKeyType::Production).unwrap(),
            "\"production\""
        );
        let legacy: ApiKeyType = serde_json::from_str("\"dev\"").unwrap();
        assert_eq!(legacy, ApiKeyType::Development);
    }

    #[test]
    fn test_usage_limit_resolve() {
        assert_eq!(UsageLimit::resolve(false, Some(500)), Ok(UsageLimit::Disabled));
        assert_eq!(UsageLimit::resolve(false, None), Ok(UsageLimit::Disabled));
        assert_eq!(UsageLimit::resolve(true, Some(500)), Ok(UsageLimit::Enabled(500)));
        assert_eq!(
            UsageLimit::resolve(true, None),
            Err(ApiKeyValidationError::MissingLimit)
        );
        assert_eq!(
            UsageLimit::resolve(true, Some(-3)),
            Err(ApiKeyValidationError::NegativeLimit(-3))
        );
    }

    #[test]
    fn test_api_key_creation() {
        let key = create_test_api_key("prod-key", UsageLimit::Enabled(500));

        assert_eq!(key.name(), "prod-key");
        assert_eq!(key.key_type(), ApiKeyType::Production);
        assert!(key.limit_enabled());
        assert_eq!(key.limit(), Some(500));

        let unlimited = create_test_api_key("free", UsageLimit::Disabled);
        assert!(!unlimited.limit_enabled());
        assert!(unlimited.limit().is_none());
    }

    #[test]
    fn test_apply_keeps_immutable_fields() {
        let mut key = create_test_api_key("before", UsageLimit::Enabled(500));
        let original = key.clone();

        key.apply(&ApiKeyChanges {
            name: Some("after".to_string()),
            key_type: Some(ApiKeyType::Development),
            usage_limit: Some(UsageLimit::Disabled),
        });

        assert_eq!(key.name(), "after");
        assert_eq!(key.key_type(), ApiKeyType::Development);
        assert!(!key.limit_enabled());
        assert!(key.limit().is_none());
        assert_eq!(key.id(), original.id());
        assert_eq!(key.key(), original.key());
        assert_eq!(key.created_at(), original.created_at());
    }

    #[test]
    fn test_stored_row_shape() {
        let key = create_test_api_key("row", UsageLimit::Enabled(10));
        let row = serde_json::to_value(&key).unwrap();

        assert_eq!(row["type"], "production");
        assert_eq!(row["limit_enabled"], true);
        assert_eq!(row["limit"], 10);
        assert!(row.get("createdAt").is_none());

        let back: ApiKey = serde_json::from_value(row).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_deserialize_store_row() {
        let row = json!({
            "id": "5b0f8f7e-1c1a-4a51-9a3c-2f3e4d5c6b7a",
            "name": "from-db",
            "key": "ffffffffffffffffffffffffffffffff",
            "created_at": "2024-05-01T10:20:30.123456+00:00",
            "type": "development",
            "limit_enabled": false,
            "limit": null
        });

        let key: ApiKey = serde_json::from_value(row).unwrap();
        assert_eq!(key.name(), "from-db");
        assert_eq!(key.key_type(), ApiKeyType::Development);
        assert!(key.limit().is_none());
    }

    #[test]
    fn test_deserialize_row_with_null_columns() {
        let row = json!({
            "id": "5b0f8f7e-1c1a-4a51-9a3c-2f3e4d5c6b7a",
            "name": "legacy",
            "key": "ffffffffffffffffffffffffffffffff",
            "created_at": "2024-05-01T10:20:30+00:00",
            "type": null,
            "limit_enabled": null,
            "limit": null
        });

        let key: ApiKey = serde_json::from_value(row).unwrap();
        assert_eq!(key.key_type(), ApiKeyType::Development);
        assert!(!key.limit_enabled());
        assert!(key.limit().is_none());
    }

    #[test]
    fn test_deserialize_row_missing_columns() {
        let row = json!({
            "id": "5b0f8f7e-1c1a-4a51-9a3c-2f3e4d5c6b7a",
            "name": "sparse",
            "key": "ffffffffffffffffffffffffffffffff",
            "created_at": "2024-05-01T10:20:30+00:00"
        });

        let key: ApiKey = serde_json::from_value(row).unwrap();
        assert_eq!(key.key_type(), ApiKeyType::Development);
        assert!(!key.limit_enabled());
    }

    #[test]
    fn test_changes_to_row() {
        let changes = ApiKeyChanges {
            name: Some("renamed".to_string()),
            key_type: None,
            usage_limit: Some(UsageLimit::Disabled),
        };

        assert_eq!(
            changes.to_row(),
            json!({"name": "renamed", "limit_enabled": false, "limit": null})
        );

        assert!(ApiKeyChanges::default().is_empty());
        assert_eq!(ApiKeyChanges::default().to_row(), json!({}));
    }
}
