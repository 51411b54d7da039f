//! Record serialization
//!
//! An explicit per-resource field-descriptor table, resolved at resource
//! registration rather than by runtime introspection of record structure.
//! Every serialized record carries `id`, `date_created` and `last_updated`
//! as RFC 3339 timestamps, plus the resource's declared output fields.
//! Nested entity and nested list fields recursively apply the same
//! contract and may attach a self-referential `uri` when an endpoint name
//! is configured for the field.

use gazetteer_interfaces::Record;
use serde_json::{Map, Value};
use std::sync::Arc;

/// How one output field obtains its value.
pub enum FieldRender<R: Record> {
    /// Read the declared column of the same name.
    Column,
    /// Compute the value from the record; used for nested entities and
    /// lists, whose closures capture whatever lookups they need.
    Computed(Arc<dyn Fn(&R) -> Value + Send + Sync>),
}

/// One declared output field.
pub struct FieldSpec<R: Record> {
    pub name: &'static str,
    render: FieldRender<R>,
}

impl<R: Record> FieldSpec<R> {
    /// A field read straight from the record's column of the same name.
    pub fn column(name: &'static str) -> Self {
        Self {
            name,
            render: FieldRender::Column,
        }
    }

    /// A field computed from the record.
    pub fn computed(
        name: &'static str,
        render: impl Fn(&R) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            render: FieldRender::Computed(Arc::new(render)),
        }
    }
}

/// The resolved field table for one resource.
pub struct Serializer<R: Record> {
    fields: Vec<FieldSpec<R>>,
}

impl<R: Record> Serializer<R> {
    pub fn new(fields: Vec<FieldSpec<R>>) -> Self {
        Self { fields }
    }

    /// Render one record as a JSON object.
    pub fn render(&self, record: &R) -> Value {
        let mut object = Map::new();
        object.insert("id".to_string(), Value::from(record.id()));
        object.insert(
            "date_created".to_string(),
            Value::from(record.date_created().to_rfc3339()),
        );
        object.insert(
            "last_updated".to_string(),
            Value::from(record.last_updated().to_rfc3339()),
        );

        for field in &self.fields {
            let value = match &field.render {
                FieldRender::Column => record.field(field.name).to_json(),
                FieldRender::Computed(render) => render(record),
            };
            object.insert(field.name.to_string(), value);
        }

        Value::Object(object)
    }

    /// Render one record for embedding inside another, attaching a
    /// self-referential `uri` when an endpoint name is configured.
    pub fn render_nested(&self, record: &R, endpoint: Option<&str>) -> Value {
        let mut value = self.render(record);
        if let (Some(endpoint), Some(object)) = (endpoint, value.as_object_mut()) {
            object.insert(
                "uri".to_string(),
                Value::from(format!("/{}/{}/", endpoint, record.id())),
            );
        }
        value
    }

    /// Render an iterator of records for embedding as a nested list.
    pub fn render_nested_list<'a>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
        endpoint: Option<&str>,
    ) -> Value {
        Value::Array(
            records
                .into_iter()
                .map(|record| self.render_nested(record, endpoint))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazetteer_interfaces::{AttrMap, FieldValue};
    use gazetteer_storage::{Table, TableRecord, Timezone};

    fn timezone(code: &str, name: &str) -> Timezone {
        let mut attrs = AttrMap::new();
        attrs.insert("code".to_string(), code.into());
        attrs.insert("name".to_string(), name.into());
        let mut record = Timezone::from_attrs(&attrs);
        record.assign_id(7);
        record.stamp_created(chrono::Utc::now());
        record
    }

    fn serializer() -> Serializer<Timezone> {
        Serializer::new(vec![
            FieldSpec::column("code"),
            FieldSpec::column("name"),
            FieldSpec::column("offset"),
        ])
    }

    #[test]
    fn render_includes_envelope_fields_and_columns() {
        let value = serializer().render(&timezone("Africa/Lagos", "West Africa Time"));
        let object = value.as_object().unwrap();
        assert_eq!(object["id"], 7);
        assert_eq!(object["code"], "Africa/Lagos");
        assert_eq!(object["offset"], Value::Null);
        assert!(object["date_created"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn nested_rendering_attaches_a_uri() {
        let value = serializer().render_nested(&timezone("UTC", "UTC"), Some("timezones"));
        assert_eq!(value["uri"], "/timezones/7/");

        let bare = serializer().render_nested(&timezone("UTC", "UTC"), None);
        assert!(bare.get("uri").is_none());
    }

    #[test]
    fn nested_lists_apply_the_same_contract() {
        let records = vec![timezone("UTC", "UTC")];
        let value = serializer().render_nested_list(&records, Some("timezones"));
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["uri"], "/timezones/7/");
    }

    #[test]
    fn computed_fields_can_join_other_tables() {
        let table: Table<Timezone> = Table::new();
        let mut attrs = AttrMap::new();
        attrs.insert("code".to_string(), "UTC".into());
        let stored = table.insert(&attrs).unwrap();

        let lookup: Table<Timezone> = table;
        let serializer = Serializer::new(vec![FieldSpec::computed("same_code", move |r: &Timezone| {
            lookup
                .get(r.id())
                .map(|other| Value::from(other.code))
                .unwrap_or(Value::Null)
        })]);

        let value = serializer.render(&stored);
        assert_eq!(value["same_code"], "UTC");
    }

    #[test]
    fn null_columns_render_as_json_null() {
        let mut attrs = AttrMap::new();
        attrs.insert("code".to_string(), "UTC".into());
        attrs.insert("offset".to_string(), FieldValue::Null);
        let record = Timezone::from_attrs(&attrs);
        let value = serializer().render(&record);
        assert_eq!(value["offset"], Value::Null);
    }
}
