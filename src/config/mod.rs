//! Application configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig, StorageSettings,
};
