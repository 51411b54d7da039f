//! Entity service contract
//!
//! The entity service is the sole component permitted to create, read,
//! update or delete a given entity type. Routing every mutation through one
//! choke point is what keeps the timestamp invariants and constraint checks
//! from being bypassed.

use async_trait::async_trait;
use thiserror::Error;

use crate::query::Selection;
use crate::record::{AttrMap, Record};

/// Store-level error type.
///
/// Constraint messages use a two-part convention: the first line is a short
/// machine-oriented label, the remainder the human message. The REST layer
/// splits them when wrapping the failure into an integrity-error response.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{message}")]
    Constraint { message: String },

    #[error("internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }

    /// A constraint failure with a label line and a message line.
    pub fn constraint(label: &str, message: impl std::fmt::Display) -> Self {
        StoreError::Constraint {
            message: format!("{}\n{}", label, message),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal {
            message: message.into(),
        }
    }
}

/// CRUD choke point for one entity type.
///
/// All mutations assign or refresh server-side timestamps; bulk mutations
/// are all-or-nothing. Implementations translate a [`Selection`] into the
/// store's own filtered, ordered row set.
#[async_trait]
pub trait EntityService: Send + Sync + 'static {
    type Record: Record;

    /// Fetch one record by primary key.
    async fn get(&self, id: i64) -> Result<Self::Record, StoreError>;

    /// Execute a compiled collection query, returning the full filtered and
    /// ordered row set. Pagination happens above this layer so that totals
    /// stay consistent with the filters.
    async fn select(&self, selection: &Selection) -> Result<Vec<Self::Record>, StoreError>;

    /// Create a record from validated attributes.
    async fn create(&self, attrs: AttrMap) -> Result<Self::Record, StoreError>;

    /// Update a record by primary key from validated attributes.
    async fn update(&self, id: i64, attrs: AttrMap) -> Result<Self::Record, StoreError>;

    /// Apply the same attributes to a set of records. All-or-nothing.
    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError>;

    /// Delete a record by primary key.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Delete a set of records by primary key. All-or-nothing.
    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError>;
}
