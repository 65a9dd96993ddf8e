//! Tenant plan assignment domain

mod entity;
mod repository;

pub use entity::{AssignmentSource, EffectivePlan, Entitlements, TenantPlan};
pub use repository::TenantPlanRepository;

#[cfg(test)]
pub use repository::MockTenantPlanRepository;
