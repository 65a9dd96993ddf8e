//! Project registry infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresProjectRepository;
pub use repository::InMemoryProjectRepository;
pub use service::{CreateProjectRequest, ProjectService, UpdateProjectRequest};
