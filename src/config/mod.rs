//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingSettings, IngestionSettings, LogFormat, LoggingConfig, ServerConfig,
    StorageConfig,
};
