//! District resource registration

use axum::Router;
use gazetteer_storage::{District, DistrictService, GeoStore};
use serde_json::Value;
use std::sync::Arc;

use crate::forms::{FieldRule, FormSchema};
use crate::resource::{resource_routes, CollectionOptions, Resource};
use crate::serializer::{FieldSpec, Serializer};

pub fn serializer(store: &Arc<GeoStore>) -> Serializer<District> {
    let city_store = store.clone();
    let city_serializer = Arc::new(Serializer::new(vec![
        FieldSpec::column("name"),
        FieldSpec::column("slug"),
    ]));

    Serializer::new(vec![
        FieldSpec::column("name"),
        FieldSpec::column("code"),
        FieldSpec::column("slug"),
        FieldSpec::column("state_id"),
        FieldSpec::column("country_id"),
        FieldSpec::column("city_id"),
        FieldSpec::computed("city", move |district: &District| {
            city_store
                .cities
                .get(district.city_id)
                .map(|city| city_serializer.render_nested(&city, Some("cities")))
                .unwrap_or(Value::Null)
        }),
    ])
}

fn schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("name").required().max_length(200),
        FieldRule::text("code").max_length(200),
        FieldRule::integer("state_id").required(),
        FieldRule::integer("country_id").required(),
        FieldRule::integer("city_id").required(),
    ])
}

pub fn options() -> CollectionOptions {
    CollectionOptions {
        sortable: vec!["id", "name", "code", "slug", "date_created", "last_updated"],
        searchable: vec!["name", "code", "slug"],
        filterable: vec!["name", "code", "slug", "state_id", "country_id", "city_id"],
        ..Default::default()
    }
}

pub fn routes(store: Arc<GeoStore>) -> Router {
    let service = Arc::new(DistrictService::new(store.clone()));
    resource_routes(
        Resource::new("districts", service, serializer(&store), schema(), schema())
            .with_options(options()),
    )
}
