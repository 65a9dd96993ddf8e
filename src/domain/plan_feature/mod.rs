//! Plan-feature assignment domain

mod entity;
mod repository;

pub use entity::PlanFeature;
pub use repository::PlanFeatureRepository;

#[cfg(test)]
pub use repository::MockPlanFeatureRepository;
