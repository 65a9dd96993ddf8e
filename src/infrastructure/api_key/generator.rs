//! API key generation
//!
//! Generates high-entropy secrets and their one-way digests.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::KEY_PREFIX_LENGTH;

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The raw key, only shown once at creation
    pub key: String,
    /// Leading characters of the random part, safe to store and display
    pub prefix: String,
    /// Digest for storage
    pub hash: String,
}

/// Generator for project API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Marker prepended to every generated key
    marker: String,
}

impl ApiKeyGenerator {
    pub const DEFAULT_MARKER: &'static str = "pfk_";

    /// Number of random bytes in a key
    const KEY_BYTES: usize = 32;

    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Generate a new API key
    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = [0u8; Self::KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let key = format!("{}{}", self.marker, URL_SAFE_NO_PAD.encode(random_bytes));
        let prefix = self.extract_prefix(&key).to_string();
        let hash = Self::hash_key(&key);

        GeneratedApiKey { key, prefix, hash }
    }

    /// Digest a raw key: `sha256$<base64url>`
    pub fn hash_key(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let result = hasher.finalize();
        format!("sha256${}", URL_SAFE_NO_PAD.encode(result))
    }

    /// Leading characters of the random part, used for display and prefix
    /// revocation, taken after the marker
    pub fn extract_prefix<'a>(&self, key: &'a str) -> &'a str {
        let body = key.strip_prefix(self.marker.as_str()).unwrap_or(key);

        match body.char_indices().nth(KEY_PREFIX_LENGTH) {
            Some((end, _)) => &body[..end],
            None => body,
        }
    }

    /// Cheap shape check before touching storage
    pub fn looks_like_key(&self, key: &str) -> bool {
        let Some(body) = key.strip_prefix(self.marker.as_str()) else {
            return false;
        };

        let expected_len = (Self::KEY_BYTES * 4).div_ceil(3);
        body.len() == expected_len
            && body
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARKER)
    }
}

/// Constant-time string comparison
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key() {
        let generator = ApiKeyGenerator::default();
        let generated = generator.generate();

        assert!(generated.key.starts_with("pfk_"));
        assert_eq!(generated.prefix.len(), KEY_PREFIX_LENGTH);
        assert!(generated.key["pfk_".len()..].starts_with(&generated.prefix));
        assert!(generated.hash.starts_with("sha256$"));
        // 32 bytes base64url without padding = 43 chars
        assert_eq!(generated.key.len(), 4 + 43);
    }

    #[test]
    fn test_key_uniqueness() {
        let generator = ApiKeyGenerator::default();
        let key1 = generator.generate();
        let key2 = generator.generate();

        assert_ne!(key1.key, key2.key);
        assert_ne!(key1.hash, key2.hash);
    }

    #[test]
    fn test_hash_never_contains_key() {
        let generated = ApiKeyGenerator::default().generate();
        assert!(!generated.hash.contains(&generated.key));
    }

    #[test]
    fn test_hash_deterministic() {
        let key = "pfk_test123";
        assert_eq!(ApiKeyGenerator::hash_key(key), ApiKeyGenerator::hash_key(key));
    }

    #[test]
    fn test_extract_prefix_skips_marker() {
        let generator = ApiKeyGenerator::default();

        assert_eq!(generator.extract_prefix("pfk_abcdefghijk"), "abcdefgh");
        assert_eq!(generator.extract_prefix("pfk_abc"), "abc");
        assert_eq!(generator.extract_prefix("short"), "short");
        assert_eq!(generator.extract_prefix("no-marker-here"), "no-marke");
    }

    #[test]
    fn test_prefixes_differ_between_keys() {
        let generator = ApiKeyGenerator::default();
        let prefixes: std::collections::HashSet<String> =
            (0..32).map(|_| generator.generate().prefix).collect();

        assert!(prefixes.len() > 1);
        assert!(prefixes.iter().all(|p| !p.starts_with("pfk_")));
    }

    #[test]
    fn test_looks_like_key() {
        let generator = ApiKeyGenerator::default();
        let generated = generator.generate();

        assert!(generator.looks_like_key(&generated.key));
        assert!(!generator.looks_like_key("pfk_short"));
        assert!(!generator.looks_like_key(&generated.key.replacen("pfk_", "pk_", 1)));
        assert!(!generator.looks_like_key(""));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }
}
