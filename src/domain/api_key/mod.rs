//! API key domain
//!
//! Project-scoped credentials. Only a digest and a short display prefix of each
//! key are stored; at most one key per project is active at any time.

mod entity;
mod repository;

pub use entity::{ApiKey, KEY_PREFIX_LENGTH};
pub use repository::ApiKeyRepository;

#[cfg(test)]
pub use repository::MockApiKeyRepository;
