//! State resource registration

use axum::Router;
use gazetteer_storage::{CityService, GeoStore, State, StateService};
use serde_json::Value;
use std::sync::Arc;

use crate::forms::{FieldRule, FormSchema};
use crate::resource::{resource_routes, CollectionOptions, Resource, SubResource};
use crate::serializer::{FieldSpec, Serializer};

pub fn serializer(store: &Arc<GeoStore>) -> Serializer<State> {
    let country_store = store.clone();
    // nested summary of the owning country, with a self-referential uri
    let country_serializer = Arc::new(Serializer::new(vec![
        FieldSpec::column("code"),
        FieldSpec::column("name"),
        FieldSpec::column("slug"),
    ]));

    Serializer::new(vec![
        FieldSpec::column("code"),
        FieldSpec::column("name"),
        FieldSpec::column("slug"),
        FieldSpec::column("country_id"),
        FieldSpec::computed("country", move |state: &State| {
            country_store
                .countries
                .get(state.country_id)
                .map(|country| country_serializer.render_nested(&country, Some("countries")))
                .unwrap_or(Value::Null)
        }),
    ])
}

fn schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("code").required().max_length(200),
        FieldRule::text("name").required().max_length(200),
        FieldRule::integer("country_id").required(),
    ])
}

pub fn options() -> CollectionOptions {
    CollectionOptions {
        sortable: vec!["id", "code", "name", "slug", "date_created", "last_updated"],
        searchable: vec!["name", "code", "slug"],
        filterable: vec!["code", "name", "slug", "country_id"],
        ..Default::default()
    }
}

pub fn routes(store: Arc<GeoStore>) -> Router {
    let service = Arc::new(StateService::new(store.clone()));

    let cities = SubResource {
        endpoint: "cities",
        service: Arc::new(CityService::new(store.clone())),
        serializer: super::cities::serializer(&store),
        parent_column: "state_id",
        options: super::cities::options(),
    };

    resource_routes(
        Resource::new("states", service, serializer(&store), schema(), schema())
            .with_options(options())
            .with_sub_resource("cities", Arc::new(cities)),
    )
}
