//! Starter dataset
//!
//! Loads a small reference dataset through the entity services, in
//! dependency order: timezones, currencies, countries, states, cities.
//! Runs only against an empty store.

use anyhow::Result;
use std::sync::Arc;

use gazetteer_interfaces::{AttrMap, EntityService, FieldValue};
use gazetteer_storage::{
    CityService, CountryService, CurrencyService, GeoStore, StateService, TimezoneService,
};

fn attrs(pairs: &[(&str, FieldValue)]) -> AttrMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub async fn load_starter_data(store: &Arc<GeoStore>) -> Result<()> {
    let timezones = TimezoneService::new(store.clone());
    let currencies = CurrencyService::new(store.clone());
    let countries = CountryService::new(store.clone());
    let states = StateService::new(store.clone());
    let cities = CityService::new(store.clone());

    let lagos_tz = timezones
        .create(attrs(&[
            ("code", "Africa/Lagos".into()),
            ("name", "West Africa Time".into()),
            ("offset", "+01:00".into()),
        ]))
        .await?;
    let accra_tz = timezones
        .create(attrs(&[
            ("code", "Africa/Accra".into()),
            ("name", "Greenwich Mean Time".into()),
            ("offset", "+00:00".into()),
        ]))
        .await?;
    timezones
        .create(attrs(&[
            ("code", "Europe/London".into()),
            ("name", "British Time".into()),
            ("offset", "+00:00".into()),
        ]))
        .await?;

    for (code, name, symbol, payment_code) in [
        ("NGN", "Naira", "\u{20a6}", "566"),
        ("GHS", "Ghana Cedi", "\u{20b5}", "936"),
        ("USD", "US Dollar", "$", "840"),
        ("GBP", "Pound Sterling", "\u{a3}", "826"),
        ("EUR", "Euro", "\u{20ac}", "978"),
    ] {
        currencies
            .create(attrs(&[
                ("code", code.into()),
                ("name", name.into()),
                ("symbol", symbol.into()),
                ("payment_code", payment_code.into()),
                ("enabled", FieldValue::Boolean(true)),
            ]))
            .await?;
    }

    let nigeria = countries
        .create(attrs(&[
            ("code", "NG".into()),
            ("name", "Nigeria".into()),
            ("phone_code", "+234".into()),
            ("enabled", FieldValue::Boolean(true)),
            ("timezone_id", FieldValue::Integer(lagos_tz.id)),
        ]))
        .await?;
    let ghana = countries
        .create(attrs(&[
            ("code", "GH".into()),
            ("name", "Ghana".into()),
            ("phone_code", "+233".into()),
            ("enabled", FieldValue::Boolean(true)),
            ("timezone_id", FieldValue::Integer(accra_tz.id)),
        ]))
        .await?;

    let lagos = states
        .create(attrs(&[
            ("code", "LA".into()),
            ("name", "Lagos".into()),
            ("country_id", FieldValue::Integer(nigeria.id)),
        ]))
        .await?;
    let rivers = states
        .create(attrs(&[
            ("code", "RV".into()),
            ("name", "Rivers".into()),
            ("country_id", FieldValue::Integer(nigeria.id)),
        ]))
        .await?;
    let greater_accra = states
        .create(attrs(&[
            ("code", "GA".into()),
            ("name", "Greater Accra".into()),
            ("country_id", FieldValue::Integer(ghana.id)),
        ]))
        .await?;

    for (name, zipcode, state_id, country_id) in [
        ("Ikeja", "100001", lagos.id, nigeria.id),
        ("Lagos Island", "101001", lagos.id, nigeria.id),
        ("Port Harcourt", "500001", rivers.id, nigeria.id),
        ("Accra", "GA000", greater_accra.id, ghana.id),
    ] {
        cities
            .create(attrs(&[
                ("name", name.into()),
                ("zipcode", zipcode.into()),
                ("state_id", FieldValue::Integer(state_id)),
                ("country_id", FieldValue::Integer(country_id)),
            ]))
            .await?;
    }

    tracing::info!(
        timezones = store.timezones.count(),
        currencies = store.currencies.count(),
        countries = store.countries.count(),
        states = store.states.count(),
        cities = store.cities.count(),
        "starter dataset loaded"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starter_data_loads_into_an_empty_store() {
        let store = GeoStore::new();
        load_starter_data(&store).await.unwrap();

        assert!(!store.is_empty());
        assert_eq!(store.countries.count(), 2);
        assert_eq!(store.states.count(), 3);
        assert_eq!(store.cities.count(), 4);
    }
}
