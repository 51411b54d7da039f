//! Country resource registration
//!
//! The richest registration: nested timezone output, a states
//! sub-collection, and enable/disable as both detail and group actions.

use axum::Router;
use gazetteer_storage::{Country, CountryService, GeoStore, StateService};
use serde_json::Value;
use std::sync::Arc;

use super::{enabled_filter_option, set_enabled_detail, set_enabled_group};
use crate::actions::ActionRegistry;
use crate::forms::{FieldRule, FormSchema};
use crate::resource::{resource_routes, CollectionOptions, Resource, SubResource};
use crate::serializer::{FieldSpec, Serializer};

pub fn serializer(store: &Arc<GeoStore>) -> Serializer<Country> {
    let timezone_store = store.clone();
    let timezone_serializer = Arc::new(super::timezones::serializer());

    Serializer::new(vec![
        FieldSpec::column("code"),
        FieldSpec::column("name"),
        FieldSpec::column("slug"),
        FieldSpec::column("phone_code"),
        FieldSpec::column("enabled"),
        FieldSpec::column("requires_post_code"),
        FieldSpec::column("timezone_id"),
        FieldSpec::computed("timezone", move |country: &Country| {
            country
                .timezone_id
                .and_then(|id| timezone_store.timezones.get(id).ok())
                .map(|tz| timezone_serializer.render_nested(&tz, Some("timezones")))
                .unwrap_or(Value::Null)
        }),
    ])
}

fn schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("code").required().max_length(200),
        FieldRule::text("name").required().max_length(200),
        FieldRule::text("phone_code").max_length(200),
        FieldRule::boolean("enabled").default_value(false),
        FieldRule::boolean("requires_post_code").default_value(false),
        FieldRule::integer("timezone_id"),
    ])
}

pub fn options() -> CollectionOptions {
    CollectionOptions {
        sortable: vec!["id", "code", "name", "slug", "date_created", "last_updated"],
        searchable: vec!["name", "code", "slug"],
        filterable: vec![
            "code",
            "name",
            "slug",
            "phone_code",
            "enabled",
            "requires_post_code",
            "timezone_id",
        ],
        filter_options: vec![enabled_filter_option()],
        ..Default::default()
    }
}

pub fn routes(store: Arc<GeoStore>) -> Router {
    let service = Arc::new(CountryService::new(store.clone()));

    let mut actions = ActionRegistry::new();
    actions.register_detail("enable", Some(FormSchema::empty()), set_enabled_detail(true));
    actions.register_detail("disable", Some(FormSchema::empty()), set_enabled_detail(false));
    actions.register_group("enable", Some(FormSchema::empty()), set_enabled_group(true));
    actions.register_group("disable", Some(FormSchema::empty()), set_enabled_group(false));

    let states = SubResource {
        endpoint: "states",
        service: Arc::new(StateService::new(store.clone())),
        serializer: super::states::serializer(&store),
        parent_column: "country_id",
        options: super::states::options(),
    };

    resource_routes(
        Resource::new("countries", service, serializer(&store), schema(), schema())
            .with_options(options())
            .with_actions(actions)
            .with_sub_resource("states", Arc::new(states)),
    )
}
