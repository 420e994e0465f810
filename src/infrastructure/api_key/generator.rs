//! API Key generation
//!
//! Generates the bearer secrets handed out to dashboard users.

use rand::rngs::OsRng;
use rand::RngCore;

/// Default number of random bytes per key (32 hex characters)
const DEFAULT_KEY_BYTES: usize = 16;

/// Number of leading characters kept when a key is written to logs
const VISIBLE_PREFIX_LEN: usize = 3;

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Number of random bytes to generate
    key_bytes: usize,
}

impl ApiKeyGenerator {
    /// Create a generator producing 16-byte keys
    pub fn new() -> Self {
        Self {
            key_bytes: DEFAULT_KEY_BYTES,
        }
    }

    /// Set the number of random bytes
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes;
        self
    }

    /// Generate a new key as lowercase hex.
    ///
    /// Reads from the operating system CSPRNG; panics only if that source
    /// is unavailable.
    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_bytes];
        OsRng.fill_bytes(&mut random_bytes);
        hex::encode(random_bytes)
    }

    /// Render a key for logs: the first few characters followed by `...`
    pub fn mask(key: &str) -> String {
        let visible: String = key.chars().take(VISIBLE_PREFIX_LEN).collect();
        format!("{}...", visible)
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
