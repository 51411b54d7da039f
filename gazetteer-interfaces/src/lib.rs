//! Core interfaces for the Gazetteer resource engine
//!
//! This crate defines the contracts the engine is assembled from: the
//! record/column abstraction every stored entity satisfies, the query
//! predicate builder and sort resolver, the entity-service trait that is
//! the single CRUD choke point per entity type, and the strategy hooks
//! a resource can inject to customize permission checks, query scoping
//! and payload adjustment.
//!
//! Keeping these traits in their own crate breaks the dependency cycle
//! between the web layer and the storage layer: both depend on the
//! contracts, neither on the other.

pub mod hooks;
pub mod query;
pub mod record;
pub mod service;

// Re-export main types for convenience
pub use hooks::{Actor, AllowAll, DataAdjuster, NoAdjustment, PermissionDenied, PermissionPolicy, QueryScope, Unscoped};
pub use query::{OrderClause, Predicate, QueryError, SearchSpec, Selection};
pub use record::{AttrMap, ColumnKind, ColumnSet, ColumnSpec, FieldValue, Record};
pub use service::{EntityService, StoreError};
