//! Domain-driven configuration management for Gazetteer
//!
//! Configuration is split by functional domain (server, storage, logging),
//! each with serde defaults, a `Validatable` implementation and
//! environment-variable overrides applied by the loader.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use domains::{
    logging::LoggingConfig, server::ServerConfig, storage::StorageConfig, GazetteerConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;
