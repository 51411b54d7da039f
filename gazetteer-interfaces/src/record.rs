//! Record and column abstractions
//!
//! Every entity exposed through the engine declares a static column set and
//! provides typed access to its field values. The query layer resolves
//! client-supplied field names against the declared columns, so an unknown
//! name can be rejected before any predicate is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::query::QueryError;

/// A validated attribute mapping, produced by form validation and consumed
/// by entity services.
pub type AttrMap = BTreeMap<String, FieldValue>;

/// A typed field value as stored on a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Render as a JSON value; timestamps serialize as RFC 3339 strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Integer(v) => serde_json::Value::from(*v),
            FieldValue::Text(v) => serde_json::Value::from(v.clone()),
            FieldValue::Boolean(v) => serde_json::Value::from(*v),
            FieldValue::Timestamp(v) => serde_json::Value::from(v.to_rfc3339()),
        }
    }

    /// Compare two values of the same kind.
    ///
    /// `Null` sorts before everything; mismatched kinds yield `None` and the
    /// predicate treating them as non-matching.
    pub fn compare(&self, other: &FieldValue) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Some(Ordering::Equal),
            (FieldValue::Null, _) => Some(Ordering::Less),
            (_, FieldValue::Null) => Some(Ordering::Greater),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

/// The declared type of a column, used to coerce raw query-string values
/// before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Text,
    Boolean,
    Timestamp,
}

impl ColumnKind {
    /// Coerce one raw string value to this column's type.
    pub fn coerce(&self, field: &str, raw: &str) -> Result<FieldValue, QueryError> {
        match self {
            ColumnKind::Integer => raw
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| QueryError::bad_value(field, raw, "an integer")),
            ColumnKind::Text => Ok(FieldValue::Text(raw.to_string())),
            ColumnKind::Boolean => Ok(FieldValue::Boolean(!matches!(
                raw.to_ascii_lowercase().as_str(),
                "false" | "f" | "n" | "no" | "0" | ""
            ))),
            ColumnKind::Timestamp => {
                if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
                    return Ok(FieldValue::Timestamp(ts.with_timezone(&Utc)));
                }
                // bare dates are accepted as midnight UTC
                if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                        return Ok(FieldValue::Timestamp(DateTime::from_naive_utc_and_offset(
                            midnight, Utc,
                        )));
                    }
                }
                Err(QueryError::bad_value(field, raw, "an RFC 3339 timestamp or YYYY-MM-DD date"))
            }
        }
    }
}

/// One declared column of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

/// The full declared column set of an entity type.
///
/// Client-supplied field names resolve against this set; resolution failure
/// is a client error, never a silent no-op.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSet {
    columns: &'static [ColumnSpec],
}

impl ColumnSet {
    pub const fn new(columns: &'static [ColumnSpec]) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolve a filter field name or fail with a client error.
    pub fn resolve_filter(&self, name: &str) -> Result<&ColumnSpec, QueryError> {
        self.get(name)
            .ok_or_else(|| QueryError::UnknownFilterField { field: name.to_string() })
    }

    /// Resolve a sort field name or fail with a client error.
    pub fn resolve_sort(&self, name: &str) -> Result<&ColumnSpec, QueryError> {
        self.get(name)
            .ok_or_else(|| QueryError::UnknownSortField { field: name.to_string() })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }
}

/// A persisted record exposed through the engine.
///
/// Every record has exactly one integer primary key and two server-assigned
/// timestamps, monotonically non-decreasing per record.
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable entity name, used in error messages.
    fn entity_name() -> &'static str;

    /// The declared column set for this entity type.
    fn columns() -> &'static ColumnSet;

    fn id(&self) -> i64;

    fn date_created(&self) -> DateTime<Utc>;

    fn last_updated(&self) -> DateTime<Utc>;

    /// Typed access to one declared column by name.
    ///
    /// Implementations return `FieldValue::Null` for nullable columns that
    /// are unset; names outside the declared set never reach this method
    /// because resolution happens against [`Record::columns`] first.
    fn field(&self, name: &str) -> FieldValue;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_integer_and_boolean() {
        assert_eq!(
            ColumnKind::Integer.coerce("id", "42").unwrap(),
            FieldValue::Integer(42)
        );
        assert!(ColumnKind::Integer.coerce("id", "forty-two").is_err());

        assert_eq!(
            ColumnKind::Boolean.coerce("enabled", "no").unwrap(),
            FieldValue::Boolean(false)
        );
        assert_eq!(
            ColumnKind::Boolean.coerce("enabled", "true").unwrap(),
            FieldValue::Boolean(true)
        );
    }

    #[test]
    fn coerce_timestamp_accepts_dates() {
        let v = ColumnKind::Timestamp.coerce("date_created", "2024-03-01").unwrap();
        match v {
            FieldValue::Timestamp(ts) => assert_eq!(ts.to_rfc3339(), "2024-03-01T00:00:00+00:00"),
            other => panic!("expected timestamp, got {:?}", other),
        }
    }

    #[test]
    fn compare_is_kind_aware() {
        use std::cmp::Ordering;
        assert_eq!(
            FieldValue::Integer(1).compare(&FieldValue::Integer(2)),
            Some(Ordering::Less)
        );
        assert_eq!(FieldValue::Integer(1).compare(&FieldValue::Text("1".into())), None);
        assert_eq!(
            FieldValue::Null.compare(&FieldValue::Integer(0)),
            Some(Ordering::Less)
        );
    }
}
