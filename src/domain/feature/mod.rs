//! Feature domain

mod entity;
mod repository;

pub use entity::{Feature, FeatureKind, FeatureUpdate};
pub use repository::FeatureRepository;

#[cfg(test)]
pub use repository::MockFeatureRepository;
