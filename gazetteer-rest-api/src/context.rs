//! Application context
//!
//! The request-scoped dependencies handed to handlers through axum state.
//! There is deliberately no process-wide mutable handle: the context is
//! built once at startup and cloned per request, with the store behind an
//! `Arc`.

use gazetteer_storage::GeoStore;
use std::sync::Arc;

/// Context for endpoints that look across the whole store, such as the
/// health probes. Resource route groups carry their own per-resource state.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<GeoStore>,
}

impl AppContext {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }
}
