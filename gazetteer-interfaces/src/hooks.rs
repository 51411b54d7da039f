//! Strategy hooks injected into a resource at registration
//!
//! One capability per trait: permission checks, query scoping and payload
//! adjustment. A resource that needs none of them uses the no-op defaults.

use gazetteer_api_types::FilterTerm;

use crate::record::{AttrMap, Record};

/// The current actor, as resolved by whatever authentication fronts the
/// engine. The engine itself only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub name: String,
}

/// Raised by a permission policy to reject a request.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct PermissionDenied {
    pub message: String,
}

impl PermissionDenied {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decides whether an actor may touch a collection or a specific record.
///
/// Checked before any query executes on the read path and before any
/// validation runs on the write path, so a rejected request never reaches
/// the store.
pub trait PermissionPolicy<R: Record>: Send + Sync {
    /// Collection-level check (list, create, bulk operations).
    fn check_collection(&self, actor: Option<&Actor>) -> Result<(), PermissionDenied>;

    /// Record-level check (fetch, update, delete, named actions). Runs
    /// against the existing record, after it has been fetched.
    fn check_record(&self, actor: Option<&Actor>, record: &R) -> Result<(), PermissionDenied>;
}

/// Default policy: everything is permitted.
pub struct AllowAll;

impl<R: Record> PermissionPolicy<R> for AllowAll {
    fn check_collection(&self, _actor: Option<&Actor>) -> Result<(), PermissionDenied> {
        Ok(())
    }

    fn check_record(&self, _actor: Option<&Actor>, _record: &R) -> Result<(), PermissionDenied> {
        Ok(())
    }
}

/// Narrows the base collection query before client filters apply.
///
/// Returned terms are compiled and conjoined exactly like client-supplied
/// filters, so a scope cannot be widened from the query string.
pub trait QueryScope: Send + Sync {
    fn scope(&self, actor: Option<&Actor>) -> Vec<FilterTerm>;
}

/// Default scope: the query is not narrowed.
pub struct Unscoped;

impl QueryScope for Unscoped {
    fn scope(&self, _actor: Option<&Actor>) -> Vec<FilterTerm> {
        Vec::new()
    }
}

/// Injects server-derived attributes into a validated payload before it is
/// persisted.
pub trait DataAdjuster: Send + Sync {
    fn adjust(&self, actor: Option<&Actor>, attrs: &mut AttrMap);
}

/// Default adjuster: the payload passes through unchanged.
pub struct NoAdjustment;

impl DataAdjuster for NoAdjustment {
    fn adjust(&self, _actor: Option<&Actor>, _attrs: &mut AttrMap) {}
}
