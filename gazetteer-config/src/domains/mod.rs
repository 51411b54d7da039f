//! Domain-specific configuration modules

pub mod logging;
pub mod server;
pub mod storage;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// The complete Gazetteer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerConfig {
    pub server: server::ServerConfig,
    pub storage: storage::StorageConfig,
    pub logging: logging::LoggingConfig,
}

impl GazetteerConfig {
    /// Validate every domain.
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

// Shared serde default helpers
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_false() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(GazetteerConfig::default().validate_all().is_ok());
    }
}
