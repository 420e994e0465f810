//! Static token allow-list behind `POST /protected`

use super::api_key::constant_time_compare;

/// Tokens accepted when none are configured
pub const DEFAULT_ALLOWED_TOKENS: [&str; 2] = ["tvly-dev-123456789", "tvly-prod-987654321"];

#[derive(Debug, Clone)]
pub struct AllowList {
    tokens: Vec<String>,
}

impl AllowList {
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Compares against every entry so timing does not depend on the match position
    pub fn contains(&self, token: &str) -> bool {
        self.tokens
            .iter()
            .fold(false, |found, allowed| constant_time_compare(allowed, token) | found)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_TOKENS)
    }
}
