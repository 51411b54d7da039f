//! Main application configuration and router setup

use axum::{routing::get, Router};
use gazetteer_storage::GeoStore;
use gazetteer_web::middleware::{cors_layer_with_config, request_id_middleware, CorsConfig};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::errors::RestError;
use crate::health;
use crate::resources;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enable CORS middleware
    pub enable_cors: bool,
    /// Enable request ID tracking
    pub enable_request_id: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
    /// CORS settings used when CORS is enabled
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_request_id: true,
            enable_tracing: true,
            cors: CorsConfig::default(),
        }
    }
}

/// Create the complete REST application: the seven resource route groups,
/// health probes, the structured-404 fallback and the middleware stack.
pub fn create_rest_app(store: Arc<GeoStore>, config: AppConfig) -> Router {
    let context = AppContext::new(store.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::health_check_detailed))
        .with_state(context);

    let mut app = Router::new()
        .merge(health_routes)
        .nest("/timezones", resources::timezones::routes(store.clone()))
        .nest("/currencies", resources::currencies::routes(store.clone()))
        .nest("/countries", resources::countries::routes(store.clone()))
        .nest("/states", resources::states::routes(store.clone()))
        .nest("/cities", resources::cities::routes(store.clone()))
        .nest("/districts", resources::districts::routes(store.clone()))
        .nest("/streets", resources::streets::routes(store))
        .fallback(fallback_handler);

    // middleware layers, applied in reverse order
    if config.enable_cors {
        app = app.layer(cors_layer_with_config(config.cors.clone()));
    }
    if config.enable_request_id {
        app = app.layer(axum::middleware::from_fn(request_id_middleware));
    }
    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

/// Unmatched routes still produce the structured error body.
async fn fallback_handler() -> RestError {
    RestError::not_found("resource not found")
}
