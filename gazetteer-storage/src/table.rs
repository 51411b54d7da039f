//! Generic in-memory table
//!
//! One table per entity type: surrogate ids assigned from a counter,
//! creation and update timestamps stamped server-side and kept
//! monotonically non-decreasing, unique-column checks under the same write
//! guard as the mutation. Bulk mutations stage their changes first and
//! commit all-or-nothing.
//!
//! Guards are held only for the duration of one call and never across an
//! await point, so the table stays a plain `std::sync` lock even though the
//! entity services expose an async contract above it.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gazetteer_interfaces::{AttrMap, FieldValue, Record, StoreError};

/// A record the in-memory table knows how to build and mutate.
pub trait TableRecord: Record {
    /// Build a fresh record from validated attributes, with declared
    /// defaults for anything absent. Ids and timestamps are assigned by the
    /// table afterwards.
    fn from_attrs(attrs: &AttrMap) -> Self;

    /// Apply validated attributes to an existing record.
    fn apply(&mut self, attrs: &AttrMap);

    fn assign_id(&mut self, id: i64);

    fn stamp_created(&mut self, now: DateTime<Utc>);

    fn stamp_updated(&mut self, now: DateTime<Utc>);

    /// Columns whose values must be unique across the table.
    fn unique_columns() -> &'static [&'static str] {
        &[]
    }
}

struct TableInner<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

/// One entity type's rows behind a single write guard.
pub struct Table<R: TableRecord> {
    inner: RwLock<TableInner<R>>,
}

impl<R: TableRecord> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableRecord> Table<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, TableInner<R>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TableInner<R>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: i64) -> Result<R, StoreError> {
        self.read()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(R::entity_name(), id))
    }

    pub fn contains(&self, id: i64) -> bool {
        self.read().rows.contains_key(&id)
    }

    pub fn all(&self) -> Vec<R> {
        self.read().rows.values().cloned().collect()
    }

    pub fn count(&self) -> u64 {
        self.read().rows.len() as u64
    }

    /// Whether any row has `value` in `column`, other than `exclude_id`.
    pub fn any_with_value(&self, column: &str, value: &FieldValue, exclude_id: Option<i64>) -> bool {
        self.read()
            .rows
            .values()
            .any(|row| Some(row.id()) != exclude_id && &row.field(column) == value)
    }

    /// Insert a new record built from validated attributes.
    pub fn insert(&self, attrs: &AttrMap) -> Result<R, StoreError> {
        let mut inner = self.write();

        let mut record = R::from_attrs(attrs);
        check_uniques(&inner.rows, &record, None)?;

        let id = inner.next_id;
        inner.next_id += 1;
        record.assign_id(id);
        record.stamp_created(Utc::now());

        inner.rows.insert(id, record.clone());
        Ok(record)
    }

    /// Apply validated attributes to one record.
    pub fn update(&self, id: i64, attrs: &AttrMap) -> Result<R, StoreError> {
        let mut inner = self.write();

        let mut record = inner
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(R::entity_name(), id))?;

        record.apply(attrs);
        check_uniques(&inner.rows, &record, Some(id))?;

        // last_updated never moves backwards
        let now = Utc::now().max(record.last_updated());
        record.stamp_updated(now);

        inner.rows.insert(id, record.clone());
        Ok(record)
    }

    /// Apply the same attributes to a set of records, all-or-nothing.
    pub fn update_many(&self, ids: &[i64], attrs: &AttrMap) -> Result<u64, StoreError> {
        let mut inner = self.write();

        let mut staged: Vec<R> = Vec::with_capacity(ids.len());
        for &id in ids {
            let mut record = inner
                .rows
                .get(&id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(R::entity_name(), id))?;
            record.apply(attrs);
            let now = Utc::now().max(record.last_updated());
            record.stamp_updated(now);
            staged.push(record);
        }

        for record in &staged {
            check_uniques_staged(&inner.rows, &staged, record)?;
        }

        let count = staged.len() as u64;
        for record in staged {
            inner.rows.insert(record.id(), record);
        }
        Ok(count)
    }

    pub fn remove(&self, id: i64) -> Result<(), StoreError> {
        self.write()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(R::entity_name(), id))
    }

    /// Remove a set of records, all-or-nothing.
    pub fn remove_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        let mut inner = self.write();

        for &id in ids {
            if !inner.rows.contains_key(&id) {
                return Err(StoreError::not_found(R::entity_name(), id));
            }
        }
        for &id in ids {
            inner.rows.remove(&id);
        }
        Ok(ids.len() as u64)
    }
}

fn check_uniques<R: TableRecord>(
    rows: &BTreeMap<i64, R>,
    candidate: &R,
    exclude_id: Option<i64>,
) -> Result<(), StoreError> {
    for column in R::unique_columns() {
        let value = candidate.field(column);
        if value.is_null() {
            continue;
        }
        let clash = rows
            .values()
            .any(|row| Some(row.id()) != exclude_id && row.field(column) == value);
        if clash {
            return Err(unique_violation::<R>(column, &value));
        }
    }
    Ok(())
}

/// Uniqueness for bulk updates: every staged record checks against the
/// untouched rows and against the other staged records.
fn check_uniques_staged<R: TableRecord>(
    rows: &BTreeMap<i64, R>,
    staged: &[R],
    candidate: &R,
) -> Result<(), StoreError> {
    let staged_ids: Vec<i64> = staged.iter().map(|r| r.id()).collect();
    for column in R::unique_columns() {
        let value = candidate.field(column);
        if value.is_null() {
            continue;
        }
        let clash_untouched = rows
            .values()
            .any(|row| !staged_ids.contains(&row.id()) && row.field(column) == value);
        let clash_staged = staged
            .iter()
            .any(|row| row.id() != candidate.id() && row.field(column) == value);
        if clash_untouched || clash_staged {
            return Err(unique_violation::<R>(column, &value));
        }
    }
    Ok(())
}

fn unique_violation<R: Record>(column: &str, value: &FieldValue) -> StoreError {
    StoreError::constraint(
        "UNIQUE_VIOLATION",
        format!(
            "{} with {} '{}' already exists",
            R::entity_name(),
            column,
            value_text(value)
        ),
    )
}

fn value_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "null".to_string(),
        FieldValue::Integer(v) => v.to_string(),
        FieldValue::Text(v) => v.clone(),
        FieldValue::Boolean(v) => v.to_string(),
        FieldValue::Timestamp(v) => v.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Timezone;
    use gazetteer_interfaces::FieldValue;

    fn attrs(pairs: &[(&str, FieldValue)]) -> AttrMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn insert_assigns_ids_and_timestamps() {
        let table: Table<Timezone> = Table::new();
        let a = table
            .insert(&attrs(&[
                ("code", "Africa/Lagos".into()),
                ("name", "West Africa Time".into()),
            ]))
            .unwrap();
        let b = table.insert(&attrs(&[("code", "Europe/Berlin".into())])).unwrap();

        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(a.date_created(), a.last_updated());
    }

    #[test]
    fn unique_columns_are_enforced() {
        let table: Table<Timezone> = Table::new();
        table.insert(&attrs(&[("code", "Africa/Lagos".into())])).unwrap();

        let err = table
            .insert(&attrs(&[("code", "Africa/Lagos".into())]))
            .unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("UNIQUE_VIOLATION\n"), "got: {}", text);
    }

    #[test]
    fn update_bumps_last_updated_monotonically() {
        let table: Table<Timezone> = Table::new();
        let created = table.insert(&attrs(&[("code", "UTC".into())])).unwrap();

        let updated = table
            .update(created.id(), &attrs(&[("name", "Coordinated Universal Time".into())]))
            .unwrap();
        assert!(updated.last_updated() >= created.last_updated());
        assert_eq!(updated.date_created(), created.date_created());
    }

    #[test]
    fn bulk_removal_is_all_or_nothing() {
        let table: Table<Timezone> = Table::new();
        let a = table.insert(&attrs(&[("code", "A".into())])).unwrap();
        let b = table.insert(&attrs(&[("code", "B".into())])).unwrap();

        let err = table.remove_many(&[a.id(), b.id(), 99]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(table.count(), 2);

        assert_eq!(table.remove_many(&[a.id(), b.id()]).unwrap(), 2);
        assert_eq!(table.count(), 0);
    }

    #[test]
    fn staged_bulk_update_checks_uniques_within_the_batch() {
        let table: Table<Timezone> = Table::new();
        let a = table.insert(&attrs(&[("code", "A".into())])).unwrap();
        let b = table.insert(&attrs(&[("code", "B".into())])).unwrap();

        // forcing both rows to the same unique code must fail atomically
        let err = table
            .update_many(&[a.id(), b.id()], &attrs(&[("code", "C".into())]))
            .unwrap_err();
        assert!(err.to_string().starts_with("UNIQUE_VIOLATION"));
        assert_eq!(table.get(a.id()).unwrap().code, "A");
        assert_eq!(table.get(b.id()).unwrap().code, "B");
    }
}
