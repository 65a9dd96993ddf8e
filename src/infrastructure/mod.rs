//! Infrastructure layer - services, repositories and runtime plumbing

pub mod api_key;
pub mod feature;
pub mod logging;
pub mod observability;
pub mod ownership;
pub mod plan;
pub mod plan_feature;
pub mod project;
pub mod storage;
pub mod tenant_plan;
