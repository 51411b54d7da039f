//! Named action registry
//!
//! Detail actions (`POST /<resource>/<id>/<action>`) and group actions
//! (`POST /<resource>/?group_ids=...&action_name=...`) are registered
//! explicitly at resource-definition time: a typed handler plus an optional
//! validation schema per name. Lookup failure is an action-denied error,
//! never a silent no-op. A group action without a schema is also denied at
//! dispatch: named group actions never run unvalidated.

use axum::http::StatusCode;
use gazetteer_interfaces::{AttrMap, EntityService};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::RestResult;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Handler for a named detail action: `(service, id, attrs) -> record`.
pub type DetailHandler<S> = Arc<
    dyn Fn(Arc<S>, i64, AttrMap) -> BoxFuture<RestResult<<S as EntityService>::Record>>
        + Send
        + Sync,
>;

/// Handler for a named group action: `(service, ids, attrs) -> (body, status)`.
pub type GroupHandler<S> =
    Arc<dyn Fn(Arc<S>, Vec<i64>, AttrMap) -> BoxFuture<RestResult<(Value, StatusCode)>> + Send + Sync>;

pub struct DetailAction<S: EntityService> {
    pub schema: Option<crate::forms::FormSchema>,
    pub handler: DetailHandler<S>,
}

pub struct GroupAction<S: EntityService> {
    pub schema: Option<crate::forms::FormSchema>,
    pub handler: GroupHandler<S>,
}

/// Name-to-handler maps for one resource, populated at registration.
pub struct ActionRegistry<S: EntityService> {
    detail: HashMap<&'static str, DetailAction<S>>,
    group: HashMap<&'static str, GroupAction<S>>,
}

impl<S: EntityService> Default for ActionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntityService> ActionRegistry<S> {
    pub fn new() -> Self {
        Self {
            detail: HashMap::new(),
            group: HashMap::new(),
        }
    }

    pub fn register_detail(
        &mut self,
        name: &'static str,
        schema: Option<crate::forms::FormSchema>,
        handler: impl Fn(Arc<S>, i64, AttrMap) -> BoxFuture<RestResult<S::Record>>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.detail.insert(
            name,
            DetailAction {
                schema,
                handler: Arc::new(handler),
            },
        );
        self
    }

    pub fn register_group(
        &mut self,
        name: &'static str,
        schema: Option<crate::forms::FormSchema>,
        handler: impl Fn(Arc<S>, Vec<i64>, AttrMap) -> BoxFuture<RestResult<(Value, StatusCode)>>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.group.insert(
            name,
            GroupAction {
                schema,
                handler: Arc::new(handler),
            },
        );
        self
    }

    pub fn detail(&self, name: &str) -> Option<&DetailAction<S>> {
        self.detail.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&GroupAction<S>> {
        self.group.get(name)
    }
}
