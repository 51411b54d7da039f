//! City resource registration

use axum::Router;
use gazetteer_storage::{City, CityService, DistrictService, GeoStore, StreetService};
use serde_json::Value;
use std::sync::Arc;

use crate::forms::{FieldRule, FormSchema};
use crate::resource::{resource_routes, CollectionOptions, Resource, SubResource};
use crate::serializer::{FieldSpec, Serializer};

pub fn serializer(store: &Arc<GeoStore>) -> Serializer<City> {
    let state_store = store.clone();
    let state_serializer = Arc::new(Serializer::new(vec![
        FieldSpec::column("code"),
        FieldSpec::column("name"),
        FieldSpec::column("slug"),
    ]));

    Serializer::new(vec![
        FieldSpec::column("name"),
        FieldSpec::column("zipcode"),
        FieldSpec::column("slug"),
        FieldSpec::column("state_id"),
        FieldSpec::column("country_id"),
        FieldSpec::computed("state", move |city: &City| {
            state_store
                .states
                .get(city.state_id)
                .map(|state| state_serializer.render_nested(&state, Some("states")))
                .unwrap_or(Value::Null)
        }),
    ])
}

fn schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("name").required().max_length(200),
        FieldRule::text("zipcode").max_length(200),
        FieldRule::integer("state_id").required(),
        FieldRule::integer("country_id").required(),
    ])
}

pub fn options() -> CollectionOptions {
    CollectionOptions {
        sortable: vec!["id", "name", "slug", "zipcode", "date_created", "last_updated"],
        searchable: vec!["name", "slug", "zipcode"],
        filterable: vec!["name", "slug", "zipcode", "state_id", "country_id"],
        ..Default::default()
    }
}

pub fn routes(store: Arc<GeoStore>) -> Router {
    let service = Arc::new(CityService::new(store.clone()));

    let districts = SubResource {
        endpoint: "districts",
        service: Arc::new(DistrictService::new(store.clone())),
        serializer: super::districts::serializer(&store),
        parent_column: "city_id",
        options: super::districts::options(),
    };
    let streets = SubResource {
        endpoint: "streets",
        service: Arc::new(StreetService::new(store.clone())),
        serializer: super::streets::serializer(),
        parent_column: "city_id",
        options: super::streets::options(),
    };

    resource_routes(
        Resource::new("cities", service, serializer(&store), schema(), schema())
            .with_options(options())
            .with_sub_resource("districts", Arc::new(districts))
            .with_sub_resource("streets", Arc::new(streets)),
    )
}
