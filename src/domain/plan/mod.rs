//! Plan domain
//!
//! Plans are named, per-project bundles of limits and feature values. Every
//! project that has plans has exactly one default plan.

mod entity;
mod repository;

pub use entity::{limits_from_value, Plan, PlanLimits, PlanUpdate};
pub use repository::PlanRepository;

#[cfg(test)]
pub use repository::MockPlanRepository;
