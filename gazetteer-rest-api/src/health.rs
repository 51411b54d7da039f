//! Health endpoints

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::context::AppContext;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe with per-table record counts.
pub async fn health_check_detailed(State(ctx): State<AppContext>) -> impl IntoResponse {
    let store = &ctx.store;
    Json(json!({
        "status": "ok",
        "tables": {
            "timezones": store.timezones.count(),
            "currencies": store.currencies.count(),
            "countries": store.countries.count(),
            "states": store.states.count(),
            "cities": store.cities.count(),
            "districts": store.districts.count(),
            "streets": store.streets.count(),
        }
    }))
}
