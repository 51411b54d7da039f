use axum::http::{HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// CORS configuration for different environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins (use ["*"] for any origin in development only)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Allow credentials
    pub allow_credentials: bool,
    /// Maximum age for preflight cache
    pub max_age: Option<Duration>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec![
                "content-type".to_string(),
                "accept".to_string(),
                "x-actor-id".to_string(),
                "x-actor-name".to_string(),
                "x-request-id".to_string(),
            ],
            allow_credentials: false,
            max_age: Some(Duration::from_secs(3600)),
        }
    }
}

impl CorsConfig {
    /// Permissive settings for development.
    pub fn development() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            ..Default::default()
        }
    }

    /// Reject combinations the CORS spec forbids.
    pub fn validate(&self) -> Result<(), String> {
        if self.allowed_origins.contains(&"*".to_string()) && self.allow_credentials {
            return Err("Cannot use wildcard origin '*' with allow_credentials: true".to_string());
        }
        Ok(())
    }
}

/// Create CORS layer with default configuration
pub fn cors_layer() -> CorsLayer {
    cors_layer_with_config(CorsConfig::default())
}

/// Create CORS layer with custom configuration
pub fn cors_layer_with_config(config: CorsConfig) -> CorsLayer {
    if let Err(e) = config.validate() {
        tracing::error!("Invalid CORS configuration: {}, falling back to defaults", e);
        return cors_layer_with_config(CorsConfig::default());
    }

    let mut cors = CorsLayer::new();

    if config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
        tracing::warn!("CORS configured to allow any origin - use only in development");
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|header| header.parse().ok())
        .collect();
    cors = cors.allow_headers(headers);

    if config.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    if let Some(max_age) = config.max_age {
        cors = cors.max_age(max_age);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_with_credentials_is_invalid() {
        let config = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(CorsConfig::development().validate().is_ok());
    }
}
