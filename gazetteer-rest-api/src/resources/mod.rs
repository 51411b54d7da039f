//! Resource registrations
//!
//! One module per geographic resource. Each declares its schemas, output
//! fields, searchable/filterable/sortable sets, sub-resources and named
//! actions, then hands the assembled [`crate::resource::Resource`] to the
//! generic route builder. Nothing here implements request handling; the
//! controller is entirely generic.

pub mod cities;
pub mod countries;
pub mod currencies;
pub mod districts;
pub mod states;
pub mod streets;
pub mod timezones;

use axum::http::StatusCode;
use gazetteer_interfaces::{AttrMap, EntityService, FieldValue};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::actions::BoxFuture;
use crate::errors::RestResult;

/// Detail-action handler that flips the record's `enabled` flag.
pub(crate) fn set_enabled_detail<S: EntityService>(
    enabled: bool,
) -> impl Fn(Arc<S>, i64, AttrMap) -> BoxFuture<RestResult<S::Record>> + Send + Sync + 'static {
    move |service, id, _attrs| {
        Box::pin(async move {
            let mut attrs = AttrMap::new();
            attrs.insert("enabled".to_string(), FieldValue::Boolean(enabled));
            Ok(service.update(id, attrs).await?)
        })
    }
}

/// Group-action handler that flips `enabled` on every targeted record.
pub(crate) fn set_enabled_group<S: EntityService>(
    enabled: bool,
) -> impl Fn(Arc<S>, Vec<i64>, AttrMap) -> BoxFuture<RestResult<(Value, StatusCode)>>
       + Send
       + Sync
       + 'static {
    move |service, ids, _attrs| {
        Box::pin(async move {
            let mut attrs = AttrMap::new();
            attrs.insert("enabled".to_string(), FieldValue::Boolean(enabled));
            let updated = service.update_many(&ids, attrs).await?;
            Ok((json!({ "updated": updated }), StatusCode::CREATED))
        })
    }
}

/// The standard enabled/disabled filter descriptor advertised to clients.
pub(crate) fn enabled_filter_option() -> Value {
    json!({
        "name": "Enabled",
        "field": "enabled",
        "values": [
            { "name": "Yes", "value": true },
            { "name": "No", "value": false }
        ]
    })
}
