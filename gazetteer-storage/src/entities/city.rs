//! City entity definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gazetteer_interfaces::{AttrMap, ColumnKind, ColumnSet, ColumnSpec, FieldValue, Record};

use super::slugify;
use crate::table::TableRecord;

/// A city within a state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub zipcode: Option<String>,
    /// Derived from `name`; refreshed on rename.
    pub slug: String,
    pub state_id: i64,
    pub country_id: i64,
    pub date_created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

static COLUMNS: ColumnSet = ColumnSet::new(&[
    ColumnSpec::new("id", ColumnKind::Integer),
    ColumnSpec::new("name", ColumnKind::Text),
    ColumnSpec::new("zipcode", ColumnKind::Text),
    ColumnSpec::new("slug", ColumnKind::Text),
    ColumnSpec::new("state_id", ColumnKind::Integer),
    ColumnSpec::new("country_id", ColumnKind::Integer),
    ColumnSpec::new("date_created", ColumnKind::Timestamp),
    ColumnSpec::new("last_updated", ColumnKind::Timestamp),
]);

impl Record for City {
    fn entity_name() -> &'static str {
        "city"
    }

    fn columns() -> &'static ColumnSet {
        &COLUMNS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            "zipcode" => self.zipcode.clone().into(),
            "slug" => self.slug.clone().into(),
            "state_id" => self.state_id.into(),
            "country_id" => self.country_id.into(),
            "date_created" => self.date_created.into(),
            "last_updated" => self.last_updated.into(),
            _ => FieldValue::Null,
        }
    }
}

impl TableRecord for City {
    fn from_attrs(attrs: &AttrMap) -> Self {
        let now = Utc::now();
        let mut record = Self {
            id: 0,
            name: String::new(),
            zipcode: None,
            slug: String::new(),
            state_id: 0,
            country_id: 0,
            date_created: now,
            last_updated: now,
        };
        record.apply(attrs);
        record
    }

    fn apply(&mut self, attrs: &AttrMap) {
        for (key, value) in attrs {
            match key.as_str() {
                "name" => {
                    if let Some(v) = value.as_str() {
                        self.name = v.to_string();
                        self.slug = slugify(&self.name);
                    }
                }
                "zipcode" => self.zipcode = value.as_str().map(str::to_string),
                "state_id" => {
                    if let Some(v) = value.as_i64() {
                        self.state_id = v;
                    }
                }
                "country_id" => {
                    if let Some(v) = value.as_i64() {
                        self.country_id = v;
                    }
                }
                _ => {}
            }
        }
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.date_created = now;
        self.last_updated = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.last_updated = now;
    }
}
