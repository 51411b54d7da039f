//! Reusable web layer for the Gazetteer resource engine
//!
//! Provides the query-surface extractors (paging, sorting, search, filters,
//! group ids), the web error type, the collection response envelope with
//! next/previous cursor building, and HTTP middleware (CORS, request id).

pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod utils;

// Re-export main types for convenience
pub use errors::{WebError, WebResult};
pub use extractors::{CurrentActor, ListArgs, SearchArgs, WritePayload};
pub use middleware::{cors_layer, cors_layer_with_config, request_id_middleware, CorsConfig, RequestId};
pub use utils::{CollectionEnvelope, OptionEntry};
