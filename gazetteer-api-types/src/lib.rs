//! Unified API types for the Gazetteer resource engine
//!
//! This crate provides the type definitions shared by the web layer, the
//! storage layer and the resource engine, so that each layer speaks the same
//! vocabulary for filtering, sorting, pagination and errors.

pub mod errors;
pub mod query;

// Re-export main types for convenience
pub use errors::{ApiError, ErrorKind, FieldErrors};
pub use query::{
    FilterOperator, FilterTerm, PageMeta, PageRequest, PageResult, SortDirection, SortSpec,
    DEFAULT_ORDER_BY, DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
