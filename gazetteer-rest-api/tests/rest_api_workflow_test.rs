//! End-to-end tests for the resource engine, driven through the real
//! router with an empty store per test.

use axum::http::StatusCode;
use axum_test::TestServer;
use gazetteer_rest_api::{create_rest_app, AppConfig};
use gazetteer_storage::GeoStore;
use serde_json::{json, Value};

fn server() -> TestServer {
    let store = GeoStore::new();
    let config = AppConfig {
        enable_tracing: false,
        ..Default::default()
    };
    TestServer::new(create_rest_app(store, config)).expect("router should start")
}

async fn create(server: &TestServer, path: &str, body: Value) -> Value {
    let response = server.post(path).json(&body).await;
    assert_eq!(
        response.status_code(),
        StatusCode::CREATED,
        "create on {} failed: {}",
        path,
        response.text()
    );
    response.json()
}

async fn seed_currencies(server: &TestServer, count: usize) {
    for i in 0..count {
        create(
            server,
            "/currencies",
            json!({ "code": format!("C{:03}", i), "name": format!("Currency {:03}", i) }),
        )
        .await;
    }
}

#[tokio::test]
async fn pagination_scenario_forty_five_entities() {
    let server = server();
    seed_currencies(&server, 45).await;

    let page1: Value = server
        .get("/currencies")
        .add_query_param("per_page", 20)
        .await
        .json();
    assert_eq!(page1["results"].as_array().unwrap().len(), 20);
    assert_eq!(page1["total"], 45);
    assert_eq!(page1["pages"], 3);
    assert_eq!(page1["page"], 1);
    assert_eq!(page1["next"], 2);
    assert!(page1.get("prev").is_none());

    let page3: Value = server
        .get("/currencies")
        .add_query_param("per_page", 20)
        .add_query_param("page", 3)
        .await
        .json();
    assert_eq!(page3["results"].as_array().unwrap().len(), 5);
    assert!(page3.get("next").is_none());
    assert_eq!(page3["prev"], 2);
}

#[tokio::test]
async fn concatenated_pages_reproduce_the_full_sorted_set() {
    let server = server();
    seed_currencies(&server, 45).await;

    let mut paged_ids = Vec::new();
    for page in 1..=3 {
        let body: Value = server
            .get("/currencies")
            .add_query_param("per_page", 20)
            .add_query_param("page", page)
            .add_query_param("order_by", "code")
            .add_query_param("asc_desc", "asc")
            .await
            .json();
        for item in body["results"].as_array().unwrap() {
            paged_ids.push(item["id"].as_i64().unwrap());
        }
    }

    let full: Value = server
        .get("/currencies")
        .add_query_param("per_page", 100)
        .add_query_param("order_by", "code")
        .add_query_param("asc_desc", "asc")
        .await
        .json();
    let full_ids: Vec<i64> = full["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();

    assert_eq!(paged_ids.len(), 45);
    assert_eq!(paged_ids, full_ids);
}

async fn seed_hierarchy(server: &TestServer) -> i64 {
    let country = create(server, "/countries", json!({ "code": "NG", "name": "Nigeria" })).await;
    let country_id = country["id"].as_i64().unwrap();

    for i in 1..=5 {
        let state = create(
            server,
            "/states",
            json!({ "code": format!("S{}", i), "name": format!("State {}", i), "country_id": country_id }),
        )
        .await;
        create(
            server,
            "/cities",
            json!({
                "name": format!("City {}", i),
                "state_id": state["id"],
                "country_id": country_id
            }),
        )
        .await;
    }
    country_id
}

#[tokio::test]
async fn between_filter_is_inclusive_and_open_ended() {
    let server = server();
    seed_hierarchy(&server).await;

    // state ids run 1..=5; between [2, 4] is inclusive on both ends
    let body: Value = server
        .get("/cities")
        .add_query_param("state_id", "2,4")
        .add_query_param("op", "btw")
        .await
        .json();
    let mut ids: Vec<i64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["state_id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3, 4]);

    // a single endpoint means an open upper bound
    let open: Value = server
        .get("/cities")
        .add_query_param("state_id", "2")
        .add_query_param("op", "btw")
        .await
        .json();
    assert_eq!(open["results"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn sort_is_stable_across_identical_requests() {
    let server = server();
    for name in ["Naira", "Dollar", "Euro", "Cedi"] {
        create(
            &server,
            "/currencies",
            json!({ "code": name[..2].to_uppercase(), "name": name }),
        )
        .await;
    }

    let names = |body: &Value| -> Vec<String> {
        body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap().to_string())
            .collect()
    };

    let first: Value = server
        .get("/currencies")
        .add_query_param("order_by", "name")
        .add_query_param("asc_desc", "asc")
        .await
        .json();
    let second: Value = server
        .get("/currencies")
        .add_query_param("order_by", "name")
        .add_query_param("asc_desc", "asc")
        .await
        .json();

    assert_eq!(names(&first), vec!["Cedi", "Dollar", "Euro", "Naira"]);
    assert_eq!(names(&first), names(&second));
}

#[tokio::test]
async fn unknown_filter_and_sort_fields_are_rejected() {
    let server = server();

    let response = server.get("/countries").add_query_param("altitude", 5).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let response = server
        .get("/countries")
        .add_query_param("order_by", "altitude")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .get("/countries")
        .add_query_param("asc_desc", "sideways")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server.get("/countries").add_query_param("op", "like").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let server = server();
    let timezone = create(
        &server,
        "/timezones",
        json!({ "code": "Africa/Lagos", "name": "West Africa Time", "offset": "+01:00" }),
    )
    .await;

    let created = create(
        &server,
        "/countries",
        json!({
            "code": "NG",
            "name": "Nigeria",
            "phone_code": "+234",
            "enabled": true,
            "timezone_id": timezone["id"]
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["slug"], "nigeria");

    let fetched: Value = server.get(&format!("/countries/{}", id)).await.json();
    assert_eq!(fetched["code"], "NG");
    assert_eq!(fetched["name"], "Nigeria");
    assert_eq!(fetched["phone_code"], "+234");
    assert_eq!(fetched["enabled"], true);
    assert!(fetched["date_created"].as_str().unwrap().contains('T'));
    assert!(fetched["last_updated"].as_str().unwrap().contains('T'));
    // nested entity with a self-referential uri
    assert_eq!(fetched["timezone"]["code"], "Africa/Lagos");
    assert_eq!(
        fetched["timezone"]["uri"],
        format!("/timezones/{}/", timezone["id"].as_i64().unwrap())
    );
}

#[tokio::test]
async fn validation_failure_short_circuits_without_persisting() {
    let server = server();

    let response = server.post("/countries").json(&json!({ "code": "NG" })).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert!(body["error"]["fields"]["name"].as_array().unwrap().len() > 0);

    let list: Value = server.get("/countries").await.json();
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn unregistered_group_action_is_rejected_without_side_effects() {
    let server = server();
    seed_currencies(&server, 2).await;

    let response = server
        .post("/currencies")
        .add_query_param("group_ids", 1)
        .add_query_param("group_ids", 2)
        .add_query_param("action_name", "promote")
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "ACTION_DENIED");

    let list: Value = server.get("/currencies").await.json();
    for item in list["results"].as_array().unwrap() {
        assert_eq!(item["enabled"], false);
    }
}

#[tokio::test]
async fn group_action_applies_to_exactly_the_given_ids() {
    let server = server();
    seed_currencies(&server, 4).await;

    let response = server
        .post("/currencies")
        .add_query_param("group_ids", 1)
        .add_query_param("group_ids", 2)
        .add_query_param("group_ids", 3)
        .add_query_param("action_name", "enable")
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["updated"], 3);

    let list: Value = server
        .get("/currencies")
        .add_query_param("order_by", "id")
        .add_query_param("asc_desc", "asc")
        .await
        .json();
    let enabled: Vec<bool> = list["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["enabled"].as_bool().unwrap())
        .collect();
    assert_eq!(enabled, vec![true, true, true, false]);
}

#[tokio::test]
async fn sub_collection_is_scoped_to_the_parent() {
    let server = server();
    let nigeria = seed_hierarchy(&server).await;
    let ghana = create(&server, "/countries", json!({ "code": "GH", "name": "Ghana" })).await;
    let ghana_id = ghana["id"].as_i64().unwrap();
    create(
        &server,
        "/states",
        json!({ "code": "GA", "name": "Greater Accra", "country_id": ghana_id }),
    )
    .await;

    let body: Value = server.get(&format!("/countries/{}/states", nigeria)).await.json();
    assert_eq!(body["endpoint"], "states");
    assert_eq!(body["total"], 5);
    for item in body["results"].as_array().unwrap() {
        assert_eq!(item["country_id"].as_i64().unwrap(), nigeria);
    }

    let response = server.get(&format!("/countries/{}/provinces", nigeria)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.get("/countries/999/states").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_action_flips_the_enabled_flag() {
    let server = server();
    let country = create(&server, "/countries", json!({ "code": "NG", "name": "Nigeria" })).await;
    let id = country["id"].as_i64().unwrap();
    assert_eq!(country["enabled"], false);

    let response = server.post(&format!("/countries/{}/enable", id)).json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["enabled"], true);

    let response = server.post(&format!("/countries/{}/disable", id)).json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["enabled"], false);
}

#[tokio::test]
async fn update_is_seeded_and_put_aliases_post() {
    let server = server();
    let country = create(
        &server,
        "/countries",
        json!({ "code": "NG", "name": "Nigeria", "phone_code": "+234" }),
    )
    .await;
    let id = country["id"].as_i64().unwrap();

    // partial update: untouched fields survive through the seed
    let response = server
        .post(&format!("/countries/{}", id))
        .json(&json!({ "name": "Federal Republic of Nigeria" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["code"], "NG");
    assert_eq!(body["phone_code"], "+234");
    assert_eq!(body["slug"], "federal-republic-of-nigeria");

    let response = server
        .put(&format!("/countries/{}", id))
        .json(&json!({ "phone_code": "+2340" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["phone_code"], "+2340");
}

#[tokio::test]
async fn deletes_return_201_like_every_write() {
    let server = server();
    seed_currencies(&server, 3).await;

    let response = server.delete("/currencies/1").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let response = server.get("/currencies/1").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .delete("/currencies")
        .add_query_param("group_ids", 2)
        .add_query_param("group_ids", 3)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["deleted"], 2);

    let list: Value = server.get("/currencies").await.json();
    assert_eq!(list["total"], 0);

    // bulk delete without ids is a client error
    let response = server.delete("/currencies").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_code_is_an_integrity_failure() {
    let server = server();
    create(&server, "/countries", json!({ "code": "NG", "name": "Nigeria" })).await;

    let response = server
        .post("/countries")
        .json(&json!({ "code": "NG", "name": "Nigeria Again" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INTEGRITY_FAILURE");
    assert_eq!(body["error"]["label"], "UNIQUE_VIOLATION");
    assert!(body["error"]["message"].as_str().unwrap().contains("NG"));
}

#[tokio::test]
async fn referenced_parent_cannot_be_deleted() {
    let server = server();
    let nigeria = seed_hierarchy(&server).await;

    let response = server.delete(&format!("/countries/{}", nigeria)).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["label"], "FOREIGN_KEY_VIOLATION");
}

#[tokio::test]
async fn cursors_preserve_filters_across_pages() {
    let server = server();
    for i in 0..25 {
        create(
            &server,
            "/currencies",
            json!({ "code": format!("E{:03}", i), "name": format!("Enabled {}", i), "enabled": true }),
        )
        .await;
    }
    for i in 0..10 {
        create(
            &server,
            "/currencies",
            json!({ "code": format!("D{:03}", i), "name": format!("Disabled {}", i) }),
        )
        .await;
    }

    let body: Value = server
        .get("/currencies")
        .add_query_param("enabled", "true")
        .add_query_param("per_page", 20)
        .await
        .json();
    assert_eq!(body["total"], 25);
    assert_eq!(body["pages"], 2);
    let next_page = body["next_page"].as_str().unwrap();
    assert!(next_page.contains("enabled=true"));
    assert!(next_page.contains("page=2"));

    // following the cursor yields the remaining filtered rows
    let followed: Value = server.get(&format!("/currencies{}", next_page)).await.json();
    assert_eq!(followed["page"], 2);
    assert_eq!(followed["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn free_text_search_and_id_shortcut() {
    let server = server();
    create(&server, "/currencies", json!({ "code": "NGN", "name": "Naira" })).await;
    create(&server, "/currencies", json!({ "code": "USD", "name": "Dollar" })).await;

    let body: Value = server.get("/currencies").add_query_param("query", "nai").await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["name"], "Naira");

    let body: Value = server.get("/currencies").add_query_param("id", 2).await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["code"], "USD");
}

#[tokio::test]
async fn unmatched_routes_produce_structured_errors() {
    let server = server();

    let response = server.get("/continents").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["status"], 404);

    let response = server.get("/currencies/999").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.get("/currencies/not-a-number").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn envelope_echoes_the_query_surface() {
    let server = server();
    seed_currencies(&server, 1).await;

    let body: Value = server
        .get("/currencies")
        .add_query_param("order_by", "code")
        .add_query_param("asc_desc", "asc")
        .add_query_param("op", "eq")
        .await
        .json();
    assert_eq!(body["endpoint"], "currencies");
    assert_eq!(body["order_by"], "code");
    assert_eq!(body["asc_desc"], "asc");
    assert_eq!(body["op"], "eq");
    assert_eq!(body["per_page"], 20);
    assert!(body["pagers"].as_array().unwrap().len() >= 5);
    assert!(body["sorters"].as_array().unwrap().len() >= 4);
}
