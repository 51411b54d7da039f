//! The store aggregate
//!
//! One table per entity type. Handed around as `Arc<GeoStore>`; the entity
//! services are the only callers that mutate it.

use std::sync::Arc;

use crate::entities::{City, Country, Currency, District, State, Street, Timezone};
use crate::table::Table;

/// All geographic reference tables.
pub struct GeoStore {
    pub timezones: Table<Timezone>,
    pub currencies: Table<Currency>,
    pub countries: Table<Country>,
    pub states: Table<State>,
    pub cities: Table<City>,
    pub districts: Table<District>,
    pub streets: Table<Street>,
}

impl GeoStore {
    pub fn new() -> Arc<Self> {
        tracing::debug!("initializing empty geographic store");
        Arc::new(Self {
            timezones: Table::new(),
            currencies: Table::new(),
            countries: Table::new(),
            states: Table::new(),
            cities: Table::new(),
            districts: Table::new(),
            streets: Table::new(),
        })
    }

    /// Whether nothing has been loaded yet; the server seeds the starter
    /// dataset only in that case.
    pub fn is_empty(&self) -> bool {
        self.timezones.count() == 0
            && self.currencies.count() == 0
            && self.countries.count() == 0
            && self.states.count() == 0
            && self.cities.count() == 0
            && self.districts.count() == 0
            && self.streets.count() == 0
    }
}
