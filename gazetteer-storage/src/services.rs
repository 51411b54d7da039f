//! Entity services
//!
//! One service per entity type, each the sole mutation path for its table.
//! Services check foreign-key references against the sibling tables before
//! a write reaches the table's own guard, and refuse to delete records that
//! are still referenced. Constraint failures carry a label line plus a
//! message line, which the REST layer splits for the integrity-error body.

use async_trait::async_trait;
use std::sync::Arc;

use gazetteer_interfaces::{AttrMap, EntityService, FieldValue, Selection, StoreError};

use crate::entities::{City, Country, Currency, District, State, Street, Timezone};
use crate::store::GeoStore;
use crate::table::{Table, TableRecord};

/// Require that an id-valued attribute points at an existing parent row.
fn ensure_parent<P: TableRecord>(
    table: &Table<P>,
    attrs: &AttrMap,
    column: &str,
) -> Result<(), StoreError> {
    if let Some(FieldValue::Integer(id)) = attrs.get(column) {
        if !table.contains(*id) {
            return Err(StoreError::constraint(
                "FOREIGN_KEY_VIOLATION",
                format!("{} with id {} does not exist", P::entity_name(), id),
            ));
        }
    }
    Ok(())
}

/// Refuse to delete a row other tables still point at.
fn ensure_unreferenced<C: TableRecord>(
    table: &Table<C>,
    column: &str,
    entity: &'static str,
    id: i64,
) -> Result<(), StoreError> {
    if table.any_with_value(column, &FieldValue::Integer(id), None) {
        return Err(StoreError::constraint(
            "FOREIGN_KEY_VIOLATION",
            format!("{} {} is still referenced by {}s", entity, id, C::entity_name()),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Timezone
// ---------------------------------------------------------------------------

pub struct TimezoneService {
    store: Arc<GeoStore>,
}

impl TimezoneService {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }

    fn check_delete(&self, id: i64) -> Result<(), StoreError> {
        ensure_unreferenced(&self.store.countries, "timezone_id", "timezone", id)
    }
}

#[async_trait]
impl EntityService for TimezoneService {
    type Record = Timezone;

    async fn get(&self, id: i64) -> Result<Timezone, StoreError> {
        self.store.timezones.get(id)
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<Timezone>, StoreError> {
        Ok(selection.apply(self.store.timezones.all()))
    }

    async fn create(&self, attrs: AttrMap) -> Result<Timezone, StoreError> {
        self.store.timezones.insert(&attrs)
    }

    async fn update(&self, id: i64, attrs: AttrMap) -> Result<Timezone, StoreError> {
        self.store.timezones.update(id, &attrs)
    }

    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError> {
        self.store.timezones.update_many(ids, &attrs)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.check_delete(id)?;
        self.store.timezones.remove(id)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        for &id in ids {
            self.check_delete(id)?;
        }
        self.store.timezones.remove_many(ids)
    }
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

pub struct CurrencyService {
    store: Arc<GeoStore>,
}

impl CurrencyService {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntityService for CurrencyService {
    type Record = Currency;

    async fn get(&self, id: i64) -> Result<Currency, StoreError> {
        self.store.currencies.get(id)
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<Currency>, StoreError> {
        Ok(selection.apply(self.store.currencies.all()))
    }

    async fn create(&self, attrs: AttrMap) -> Result<Currency, StoreError> {
        self.store.currencies.insert(&attrs)
    }

    async fn update(&self, id: i64, attrs: AttrMap) -> Result<Currency, StoreError> {
        self.store.currencies.update(id, &attrs)
    }

    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError> {
        self.store.currencies.update_many(ids, &attrs)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.currencies.remove(id)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        self.store.currencies.remove_many(ids)
    }
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

pub struct CountryService {
    store: Arc<GeoStore>,
}

impl CountryService {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }

    fn check_parents(&self, attrs: &AttrMap) -> Result<(), StoreError> {
        ensure_parent(&self.store.timezones, attrs, "timezone_id")
    }

    fn check_delete(&self, id: i64) -> Result<(), StoreError> {
        ensure_unreferenced(&self.store.states, "country_id", "country", id)?;
        ensure_unreferenced(&self.store.cities, "country_id", "country", id)?;
        ensure_unreferenced(&self.store.districts, "country_id", "country", id)?;
        ensure_unreferenced(&self.store.streets, "country_id", "country", id)
    }
}

#[async_trait]
impl EntityService for CountryService {
    type Record = Country;

    async fn get(&self, id: i64) -> Result<Country, StoreError> {
        self.store.countries.get(id)
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<Country>, StoreError> {
        Ok(selection.apply(self.store.countries.all()))
    }

    async fn create(&self, attrs: AttrMap) -> Result<Country, StoreError> {
        self.check_parents(&attrs)?;
        self.store.countries.insert(&attrs)
    }

    async fn update(&self, id: i64, attrs: AttrMap) -> Result<Country, StoreError> {
        self.check_parents(&attrs)?;
        self.store.countries.update(id, &attrs)
    }

    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError> {
        self.check_parents(&attrs)?;
        self.store.countries.update_many(ids, &attrs)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.check_delete(id)?;
        self.store.countries.remove(id)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        for &id in ids {
            self.check_delete(id)?;
        }
        self.store.countries.remove_many(ids)
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub struct StateService {
    store: Arc<GeoStore>,
}

impl StateService {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }

    fn check_parents(&self, attrs: &AttrMap) -> Result<(), StoreError> {
        ensure_parent(&self.store.countries, attrs, "country_id")
    }

    fn check_delete(&self, id: i64) -> Result<(), StoreError> {
        ensure_unreferenced(&self.store.cities, "state_id", "state", id)?;
        ensure_unreferenced(&self.store.districts, "state_id", "state", id)?;
        ensure_unreferenced(&self.store.streets, "state_id", "state", id)
    }
}

#[async_trait]
impl EntityService for StateService {
    type Record = State;

    async fn get(&self, id: i64) -> Result<State, StoreError> {
        self.store.states.get(id)
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<State>, StoreError> {
        Ok(selection.apply(self.store.states.all()))
    }

    async fn create(&self, attrs: AttrMap) -> Result<State, StoreError> {
        self.check_parents(&attrs)?;
        self.store.states.insert(&attrs)
    }

    async fn update(&self, id: i64, attrs: AttrMap) -> Result<State, StoreError> {
        self.check_parents(&attrs)?;
        self.store.states.update(id, &attrs)
    }

    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError> {
        self.check_parents(&attrs)?;
        self.store.states.update_many(ids, &attrs)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.check_delete(id)?;
        self.store.states.remove(id)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        for &id in ids {
            self.check_delete(id)?;
        }
        self.store.states.remove_many(ids)
    }
}

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

pub struct CityService {
    store: Arc<GeoStore>,
}

impl CityService {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }

    fn check_parents(&self, attrs: &AttrMap) -> Result<(), StoreError> {
        ensure_parent(&self.store.states, attrs, "state_id")?;
        ensure_parent(&self.store.countries, attrs, "country_id")
    }

    fn check_delete(&self, id: i64) -> Result<(), StoreError> {
        ensure_unreferenced(&self.store.districts, "city_id", "city", id)?;
        ensure_unreferenced(&self.store.streets, "city_id", "city", id)
    }
}

#[async_trait]
impl EntityService for CityService {
    type Record = City;

    async fn get(&self, id: i64) -> Result<City, StoreError> {
        self.store.cities.get(id)
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<City>, StoreError> {
        Ok(selection.apply(self.store.cities.all()))
    }

    async fn create(&self, attrs: AttrMap) -> Result<City, StoreError> {
        self.check_parents(&attrs)?;
        self.store.cities.insert(&attrs)
    }

    async fn update(&self, id: i64, attrs: AttrMap) -> Result<City, StoreError> {
        self.check_parents(&attrs)?;
        self.store.cities.update(id, &attrs)
    }

    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError> {
        self.check_parents(&attrs)?;
        self.store.cities.update_many(ids, &attrs)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.check_delete(id)?;
        self.store.cities.remove(id)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        for &id in ids {
            self.check_delete(id)?;
        }
        self.store.cities.remove_many(ids)
    }
}

// ---------------------------------------------------------------------------
// District
// ---------------------------------------------------------------------------

pub struct DistrictService {
    store: Arc<GeoStore>,
}

impl DistrictService {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }

    fn check_parents(&self, attrs: &AttrMap) -> Result<(), StoreError> {
        ensure_parent(&self.store.states, attrs, "state_id")?;
        ensure_parent(&self.store.countries, attrs, "country_id")?;
        ensure_parent(&self.store.cities, attrs, "city_id")
    }

    fn check_delete(&self, id: i64) -> Result<(), StoreError> {
        ensure_unreferenced(&self.store.streets, "district_id", "district", id)
    }
}

#[async_trait]
impl EntityService for DistrictService {
    type Record = District;

    async fn get(&self, id: i64) -> Result<District, StoreError> {
        self.store.districts.get(id)
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<District>, StoreError> {
        Ok(selection.apply(self.store.districts.all()))
    }

    async fn create(&self, attrs: AttrMap) -> Result<District, StoreError> {
        self.check_parents(&attrs)?;
        self.store.districts.insert(&attrs)
    }

    async fn update(&self, id: i64, attrs: AttrMap) -> Result<District, StoreError> {
        self.check_parents(&attrs)?;
        self.store.districts.update(id, &attrs)
    }

    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError> {
        self.check_parents(&attrs)?;
        self.store.districts.update_many(ids, &attrs)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.check_delete(id)?;
        self.store.districts.remove(id)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        for &id in ids {
            self.check_delete(id)?;
        }
        self.store.districts.remove_many(ids)
    }
}

// ---------------------------------------------------------------------------
// Street
// ---------------------------------------------------------------------------

pub struct StreetService {
    store: Arc<GeoStore>,
}

impl StreetService {
    pub fn new(store: Arc<GeoStore>) -> Self {
        Self { store }
    }

    fn check_parents(&self, attrs: &AttrMap) -> Result<(), StoreError> {
        ensure_parent(&self.store.cities, attrs, "city_id")?;
        ensure_parent(&self.store.districts, attrs, "district_id")?;
        ensure_parent(&self.store.states, attrs, "state_id")?;
        ensure_parent(&self.store.countries, attrs, "country_id")
    }
}

#[async_trait]
impl EntityService for StreetService {
    type Record = Street;

    async fn get(&self, id: i64) -> Result<Street, StoreError> {
        self.store.streets.get(id)
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<Street>, StoreError> {
        Ok(selection.apply(self.store.streets.all()))
    }

    async fn create(&self, attrs: AttrMap) -> Result<Street, StoreError> {
        self.check_parents(&attrs)?;
        self.store.streets.insert(&attrs)
    }

    async fn update(&self, id: i64, attrs: AttrMap) -> Result<Street, StoreError> {
        self.check_parents(&attrs)?;
        self.store.streets.update(id, &attrs)
    }

    async fn update_many(&self, ids: &[i64], attrs: AttrMap) -> Result<u64, StoreError> {
        self.check_parents(&attrs)?;
        self.store.streets.update_many(ids, &attrs)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.streets.remove(id)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        self.store.streets.remove_many(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazetteer_api_types::{SortDirection, SortSpec};
    use gazetteer_interfaces::{OrderClause, Record, Selection};

    fn attrs(pairs: &[(&str, FieldValue)]) -> AttrMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    async fn seed_country(store: &Arc<GeoStore>) -> Country {
        CountryService::new(store.clone())
            .create(attrs(&[("code", "NG".into()), ("name", "Nigeria".into())]))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn foreign_keys_are_checked_on_create() {
        let store = GeoStore::new();
        let states = StateService::new(store.clone());

        let err = states
            .create(attrs(&[
                ("code", "LA".into()),
                ("name", "Lagos".into()),
                ("country_id", FieldValue::Integer(99)),
            ]))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("FOREIGN_KEY_VIOLATION"));

        let country = seed_country(&store).await;
        let state = states
            .create(attrs(&[
                ("code", "LA".into()),
                ("name", "Lagos".into()),
                ("country_id", FieldValue::Integer(country.id())),
            ]))
            .await
            .unwrap();
        assert_eq!(state.country_id, country.id());
    }

    #[tokio::test]
    async fn referenced_rows_cannot_be_deleted() {
        let store = GeoStore::new();
        let countries = CountryService::new(store.clone());
        let states = StateService::new(store.clone());

        let country = seed_country(&store).await;
        states
            .create(attrs(&[
                ("code", "LA".into()),
                ("name", "Lagos".into()),
                ("country_id", FieldValue::Integer(country.id())),
            ]))
            .await
            .unwrap();

        let err = countries.delete(country.id()).await.unwrap_err();
        assert!(err.to_string().starts_with("FOREIGN_KEY_VIOLATION"));
    }

    #[tokio::test]
    async fn select_applies_filters_and_order() {
        let store = GeoStore::new();
        let countries = CountryService::new(store.clone());

        for (code, name, enabled) in [("NG", "Nigeria", true), ("GH", "Ghana", false), ("KE", "Kenya", true)] {
            countries
                .create(attrs(&[
                    ("code", code.into()),
                    ("name", name.into()),
                    ("enabled", FieldValue::Boolean(enabled)),
                ]))
                .await
                .unwrap();
        }

        let order = OrderClause::resolve(
            &["name"],
            Country::columns(),
            &SortSpec::new("name", SortDirection::Asc),
        )
        .unwrap();
        let selection = Selection::new(order).with_predicates(vec![
            gazetteer_interfaces::Predicate::build(
                Country::columns(),
                &gazetteer_api_types::FilterTerm::new(
                    "enabled",
                    gazetteer_api_types::FilterOperator::Eq,
                    vec!["true".to_string()],
                ),
            )
            .unwrap(),
        ]);

        let rows = countries.select(&selection).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Kenya", "Nigeria"]);
    }
}
