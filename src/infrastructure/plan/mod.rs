//! Plan catalog infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresPlanRepository;
pub use repository::InMemoryPlanRepository;
pub use service::{CreatePlanRequest, PlanService, UpdatePlanRequest};
