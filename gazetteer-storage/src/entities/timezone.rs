//! Timezone entity definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gazetteer_interfaces::{AttrMap, ColumnKind, ColumnSet, ColumnSpec, FieldValue, Record};

use crate::table::TableRecord;

/// A named timezone with its UTC offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timezone {
    pub id: i64,
    /// Olson identifier, e.g. `Africa/Lagos`. Unique.
    pub code: String,
    pub name: String,
    /// UTC offset, e.g. `+01:00`.
    pub offset: Option<String>,
    pub date_created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

static COLUMNS: ColumnSet = ColumnSet::new(&[
    ColumnSpec::new("id", ColumnKind::Integer),
    ColumnSpec::new("code", ColumnKind::Text),
    ColumnSpec::new("name", ColumnKind::Text),
    ColumnSpec::new("offset", ColumnKind::Text),
    ColumnSpec::new("date_created", ColumnKind::Timestamp),
    ColumnSpec::new("last_updated", ColumnKind::Timestamp),
]);

impl Record for Timezone {
    fn entity_name() -> &'static str {
        "timezone"
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
            "code" => self.code.clone().into(),
            "name" => self.name.clone().into(),
            "offset" => self.offset.clone().into(),
            "date_created" => self.date_created.into(),
            "last_updated" => self.last_updated.into(),
            _ => FieldValue::Null,
        }
    }
}

impl TableRecord for Timezone {
    fn from_attrs(attrs: &AttrMap) -> Self {
        let now = Utc::now();
        let mut record = Self {
            id: 0,
            code: String::new(),
            name: String::new(),
            offset: None,
            date_created: now,
            last_updated: now,
        };
        record.apply(attrs);
        record
    }

    fn apply(&mut self, attrs: &AttrMap) {
        for (key, value) in attrs {
            match key.as_str() {
                "code" => {
                    if let Some(v) = value.as_str() {
                        self.code = v.to_string();
                    }
                }
                "name" => {
                    if let Some(v) = value.as_str() {
                        self.name = v.to_string();
                    }
                }
                "offset" => self.offset = value.as_str().map(str::to_string),
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

    fn unique_columns() -> &'static [&'static str] {
        &["code"]
    }
}
