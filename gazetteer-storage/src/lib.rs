//! In-memory relational-style store for the Gazetteer engine
//!
//! The store keeps one [`table::Table`] per entity type behind the
//! [`store::GeoStore`] aggregate. Records are only ever created or mutated
//! through the entity services in [`services`], which enforce unique and
//! foreign-key constraints and keep the server-assigned timestamp
//! invariants. A relational backend would implement the same
//! [`gazetteer_interfaces::EntityService`] contract against a real
//! transaction per request without touching the engine above it.

pub mod entities;
pub mod services;
pub mod store;
pub mod table;

pub use entities::{City, Country, Currency, District, State, Street, Timezone};
pub use services::{
    CityService, CountryService, CurrencyService, DistrictService, StateService, StreetService,
    TimezoneService,
};
pub use store::GeoStore;
pub use table::{Table, TableRecord};
