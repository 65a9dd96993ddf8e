//! Project domain
//!
//! Projects own plans, features and API keys. A project is identified by a
//! unique, normalized code that never changes after creation.

mod entity;
mod repository;

pub use entity::{Project, ProjectUpdate};
pub use repository::ProjectRepository;

#[cfg(test)]
pub use repository::MockProjectRepository;
