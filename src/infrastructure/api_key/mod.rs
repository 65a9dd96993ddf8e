//! API key authority
//!
//! Key generation and digesting, storage, rotation and validation.

mod generator;
mod postgres_repository;
mod repository;
mod service;

pub use generator::{constant_time_compare, ApiKeyGenerator, GeneratedApiKey};
pub use postgres_repository::PostgresApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, IssuedApiKey};
