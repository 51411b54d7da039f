//! Storage configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Load the starter dataset at startup when the store is empty
    #[serde(default = "super::default_true")]
    pub seed_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { seed_on_start: true }
    }
}

impl Validatable for StorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "storage"
    }
}
