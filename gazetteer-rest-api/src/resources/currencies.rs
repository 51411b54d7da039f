//! Currency resource registration

use axum::Router;
use gazetteer_storage::{Currency, CurrencyService, GeoStore};
use std::sync::Arc;

use super::{enabled_filter_option, set_enabled_group};
use crate::actions::ActionRegistry;
use crate::forms::{FieldRule, FormSchema};
use crate::resource::{resource_routes, CollectionOptions, Resource};
use crate::serializer::{FieldSpec, Serializer};

pub fn serializer() -> Serializer<Currency> {
    Serializer::new(vec![
        FieldSpec::column("code"),
        FieldSpec::column("name"),
        FieldSpec::column("enabled"),
        FieldSpec::column("symbol"),
        FieldSpec::column("payment_code"),
    ])
}

fn schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("code").required().max_length(200),
        FieldRule::text("name").required().max_length(200),
        FieldRule::boolean("enabled").default_value(false),
        FieldRule::text("symbol").max_length(200),
        FieldRule::text("payment_code").max_length(200),
    ])
}

pub fn options() -> CollectionOptions {
    CollectionOptions {
        sortable: vec!["id", "code", "name", "date_created", "last_updated"],
        searchable: vec!["code", "name"],
        filterable: vec!["code", "name", "enabled", "payment_code"],
        filter_options: vec![enabled_filter_option()],
        ..Default::default()
    }
}

pub fn routes(store: Arc<GeoStore>) -> Router {
    let service = Arc::new(CurrencyService::new(store));

    let mut actions = ActionRegistry::new();
    actions.register_group("enable", Some(FormSchema::empty()), set_enabled_group(true));
    actions.register_group("disable", Some(FormSchema::empty()), set_enabled_group(false));

    resource_routes(
        Resource::new("currencies", service, serializer(), schema(), schema())
            .with_options(options())
            .with_actions(actions),
    )
}
