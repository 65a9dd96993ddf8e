//! Tenant entitlement infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresTenantPlanRepository;
pub use repository::InMemoryTenantPlanRepository;
pub use service::TenantPlanService;
