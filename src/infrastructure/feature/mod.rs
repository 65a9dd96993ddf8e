//! Feature catalog infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresFeatureRepository;
pub use repository::InMemoryFeatureRepository;
pub use service::{CreateFeatureRequest, FeatureService, UpdateFeatureRequest};
