use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }
}

/// Failure reported by the key record store
///
/// Carries the store's own message plus the optional vendor error code,
/// details and hint, as returned by the hosted database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
    hint: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Hint for the operator: the store's own hint when it sent one,
    /// otherwise a hint derived from the Postgres error code.
    pub fn hint(&self) -> Option<String> {
        self.hint
            .clone()
            .or_else(|| self.code.as_deref().and_then(hint_for_code).map(String::from))
    }
}

fn hint_for_code(code: &str) -> Option<&'static str> {
    match code {
        "42P01" => Some("The api_keys table does not exist. Create it in the database first."),
        "23505" => Some("A record with the same unique value already exists."),
        "42703" => Some("The api_keys table is missing a required column."),
        c if c.starts_with("28") => {
            Some("Insufficient privileges. Check the database role and access policies.")
        }
        c if c.starts_with('2') => Some("The data was rejected by database validation."),
        _ => None,
    }
}
