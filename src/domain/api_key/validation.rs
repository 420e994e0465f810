//! API Key validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during API key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("name is required and cannot be blank")]
    EmptyName,

    #[error("limit is required when limit_enabled is true")]
    MissingLimit,

    #[error("limit must be zero or greater, got {0}")]
    NegativeLimit(i64),

    #[error("limit must be at most {max}, got {0}", max = MAX_LIMIT)]
    LimitTooLarge(i64),

    #[error("unknown key type '{0}'. Expected 'production' or 'development'")]
    UnknownType(String),

    #[error("'{0}' is not a valid API key ID")]
    InvalidId(String),
}

impl From<ApiKeyValidationError> for DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        match err {
            ApiKeyValidationError::InvalidId(_) => DomainError::invalid_id(err.to_string()),
            _ => DomainError::validation(err.to_string()),
        }
    }
}

/// Validate a key's display name, returning it trimmed
pub fn validate_name(name: &str) -> Result<String, ApiKeyValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    Ok(trimmed.to_string())
}

/// Largest limit the `INTEGER` column can hold
pub const MAX_LIMIT: i64 = i32::MAX as i64;

/// Validate a usage ceiling value
pub fn validate_limit(limit: i64) -> Result<i64, ApiKeyValidationError> {
    if limit < 0 {
        return Err(ApiKeyValidationError::NegativeLimit(limit));
    }

    if limit > MAX_LIMIT {
        return Err(ApiKeyValidationError::LimitTooLarge(limit));
    }

    Ok(limit)
}
