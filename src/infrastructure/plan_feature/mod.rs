//! Plan-feature assignment infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresPlanFeatureRepository;
pub use repository::InMemoryPlanFeatureRepository;
pub use service::PlanFeatureService;
