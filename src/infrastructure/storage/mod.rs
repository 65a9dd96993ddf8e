//! Storage infrastructure - connection pooling, migrations and backend selection

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageConfig, StorageFactory, StorageType};
pub use migrations::{run_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, is_unique_violation, storage_error, PostgresConfig};
