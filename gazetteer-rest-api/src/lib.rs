//! Gazetteer REST API
//!
//! The generic resource-query engine: form validation, serialization,
//! the action registry, the resource controller with its pager and
//! sub-resource dispatch, the error funnel, and the per-resource
//! registrations for the geographic reference data.

pub mod actions;
pub mod app;
pub mod context;
pub mod errors;
pub mod forms;
pub mod health;
pub mod resource;
pub mod resources;
pub mod serializer;

// Re-export main types for convenience
pub use actions::ActionRegistry;
pub use app::{create_rest_app, AppConfig};
pub use context::AppContext;
pub use errors::{RestError, RestResult};
pub use forms::{FieldRule, FormSchema};
pub use resource::{resource_routes, CollectionOptions, Resource, SubCollection, SubResource};
pub use serializer::{FieldSpec, Serializer};
