//! Street resource registration

use axum::Router;
use gazetteer_storage::{GeoStore, Street, StreetService};
use std::sync::Arc;

use crate::forms::{FieldRule, FormSchema};
use crate::resource::{resource_routes, CollectionOptions, Resource};
use crate::serializer::{FieldSpec, Serializer};

pub fn serializer() -> Serializer<Street> {
    Serializer::new(vec![
        FieldSpec::column("name"),
        FieldSpec::column("code"),
        FieldSpec::column("city_id"),
        FieldSpec::column("district_id"),
        FieldSpec::column("state_id"),
        FieldSpec::column("country_id"),
    ])
}

fn schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("name").required().max_length(200),
        FieldRule::text("code").max_length(200),
        FieldRule::integer("city_id").required(),
        FieldRule::integer("district_id"),
        FieldRule::integer("state_id").required(),
        FieldRule::integer("country_id").required(),
    ])
}

pub fn options() -> CollectionOptions {
    CollectionOptions {
        sortable: vec!["id", "name", "code", "date_created", "last_updated"],
        searchable: vec!["name", "code"],
        filterable: vec!["name", "code", "city_id", "district_id", "state_id", "country_id"],
        ..Default::default()
    }
}

pub fn routes(store: Arc<GeoStore>) -> Router {
    let service = Arc::new(StreetService::new(store.clone()));
    resource_routes(
        Resource::new("streets", service, serializer(), schema(), schema()).with_options(options()),
    )
}
