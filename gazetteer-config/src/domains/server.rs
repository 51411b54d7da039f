//! Server configuration for the REST API

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::{validate_port_range, validate_required_string, Validatable};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            cors: CorsSettings::default(),
        }
    }
}

impl ServerConfig {
    /// The socket address string to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// CORS settings mapped onto the web layer at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Allowed origins (["*"] for any origin, development only)
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: Vec<String>,

    /// Whether to allow credentials
    #[serde(default = "super::default_false")]
    pub allow_credentials: bool,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_cors_origins(),
            allow_credentials: false,
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_port_range(self.port, "port", self.domain_name())?;

        if self.cors.allowed_origins.contains(&"*".to_string()) && self.cors.allow_credentials {
            return Err(self.validation_error(
                "cannot combine wildcard CORS origin '*' with allow_credentials",
            ));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.address(), "127.0.0.1:8090");
    }

    #[test]
    fn wildcard_origin_with_credentials_is_rejected() {
        let config = ServerConfig {
            cors: CorsSettings {
                allowed_origins: vec!["*".to_string()],
                allow_credentials: true,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
