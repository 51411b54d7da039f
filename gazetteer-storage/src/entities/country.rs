//! Country entity definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gazetteer_interfaces::{AttrMap, ColumnKind, ColumnSet, ColumnSpec, FieldValue, Record};

use super::slugify;
use crate::table::TableRecord;

/// A country. The root of the geographic hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    /// ISO 3166 code, e.g. `NG`. Unique.
    pub code: String,
    /// Display name. Unique.
    pub name: String,
    /// Derived from `name`; refreshed on rename.
    pub slug: String,
    pub phone_code: Option<String>,
    pub enabled: bool,
    pub requires_post_code: bool,
    pub timezone_id: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

static COLUMNS: ColumnSet = ColumnSet::new(&[
    ColumnSpec::new("id", ColumnKind::Integer),
    ColumnSpec::new("code", ColumnKind::Text),
    ColumnSpec::new("name", ColumnKind::Text),
    ColumnSpec::new("slug", ColumnKind::Text),
    ColumnSpec::new("phone_code", ColumnKind::Text),
    ColumnSpec::new("enabled", ColumnKind::Boolean),
    ColumnSpec::new("requires_post_code", ColumnKind::Boolean),
    ColumnSpec::new("timezone_id", ColumnKind::Integer),
    ColumnSpec::new("date_created", ColumnKind::Timestamp),
    ColumnSpec::new("last_updated", ColumnKind::Timestamp),
]);

impl Record for Country {
    fn entity_name() -> &'static str {
        "country"
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
            "slug" => self.slug.clone().into(),
            "phone_code" => self.phone_code.clone().into(),
            "enabled" => self.enabled.into(),
            "requires_post_code" => self.requires_post_code.into(),
            "timezone_id" => self.timezone_id.into(),
            "date_created" => self.date_created.into(),
            "last_updated" => self.last_updated.into(),
            _ => FieldValue::Null,
        }
    }
}

impl TableRecord for Country {
    fn from_attrs(attrs: &AttrMap) -> Self {
        let now = Utc::now();
        let mut record = Self {
            id: 0,
            code: String::new(),
            name: String::new(),
            slug: String::new(),
            phone_code: None,
            enabled: false,
            requires_post_code: false,
            timezone_id: None,
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
                        self.slug = slugify(&self.name);
                    }
                }
                "phone_code" => self.phone_code = value.as_str().map(str::to_string),
                "enabled" => {
                    if let Some(v) = value.as_bool() {
                        self.enabled = v;
                    }
                }
                "requires_post_code" => {
                    if let Some(v) = value.as_bool() {
                        self.requires_post_code = v;
                    }
                }
                "timezone_id" => self.timezone_id = value.as_i64(),
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
        &["code", "name"]
    }
}
