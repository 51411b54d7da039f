//! Timezone resource registration

use axum::Router;
use gazetteer_storage::{GeoStore, Timezone, TimezoneService};
use std::sync::Arc;

use crate::forms::{FieldRule, FormSchema};
use crate::resource::{resource_routes, CollectionOptions, Resource};
use crate::serializer::{FieldSpec, Serializer};

pub fn serializer() -> Serializer<Timezone> {
    Serializer::new(vec![
        FieldSpec::column("code"),
        FieldSpec::column("name"),
        FieldSpec::column("offset"),
    ])
}

fn schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("code").required().max_length(200),
        FieldRule::text("name").required().max_length(200),
        FieldRule::text("offset").max_length(200),
    ])
}

pub fn options() -> CollectionOptions {
    CollectionOptions {
        sortable: vec!["id", "code", "name", "date_created", "last_updated"],
        searchable: vec!["code", "name"],
        filterable: vec!["code", "name", "offset"],
        ..Default::default()
    }
}

pub fn routes(store: Arc<GeoStore>) -> Router {
    let service = Arc::new(TimezoneService::new(store));
    resource_routes(
        Resource::new("timezones", service, serializer(), schema(), schema()).with_options(options()),
    )
}
