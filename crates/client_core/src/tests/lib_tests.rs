use super::*;
use std::{collections::HashMap, time::Duration};

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{CityId, UserId, UNKNOWN_CITY, UNKNOWN_OWNER};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
struct RecordedRequest {
    method: &'static str,
    path: String,
    body: Value,
}

#[derive(Clone, Default)]
struct BackendState {
    buses: Arc<Mutex<Value>>,
    fail_bus_list: bool,
    list_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    lookups: Arc<Mutex<Vec<String>>>,
    mutations: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl BackendState {
    fn with_buses(buses: Value) -> Self {
        Self {
            buses: Arc::new(Mutex::new(buses)),
            ..Self::default()
        }
    }
}

async fn handle_bus_list(
    State(state): State<BackendState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.list_queries.lock().await.push(params);
    if state.fail_bus_list {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database unavailable" })),
        );
    }
    let buses = match state.buses.lock().await.clone() {
        Value::Null => json!([]),
        buses => buses,
    };
    (StatusCode::OK, Json(json!({ "buses": buses, "totalPages": 2 })))
}

async fn handle_user_list(
    State(state): State<BackendState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let filter = params.get("filter").cloned().unwrap_or_default();
    state.list_queries.lock().await.push(params);
    let users = if filter == "Owner" {
        json!([{ "_id": "O1", "name": "Alice", "username": "alice", "active": true }])
    } else {
        json!([
            { "_id": "S1", "name": "Ravi", "email": "ravi@example.com", "active": true },
            { "_id": "S2", "name": "", "username": "driver02", "active": false }
        ])
    };
    Json(json!({ "users": users, "totalPages": 1 }))
}

async fn handle_city_list(
    State(state): State<BackendState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.list_queries.lock().await.push(params);
    Json(json!({
        "cities": [{
            "_id": "c-agra",
            "cityName": "Agra",
            "cityPincode": "282001",
            "stops": [{ "stopId": "taj", "stopName": "Taj", "stopTimings": "10:00", "stopDuration": "15" }],
            "createdAt": "2024-03-01T10:00:00Z"
        }],
        "totalPages": 1
    }))
}

async fn handle_user_lookup(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.lookups.lock().await.push(format!("user:{id}"));
    match id.as_str() {
        "O1" => (StatusCode::OK, Json(json!({ "name": "Alice", "username": "alice" }))),
        "O3" => (StatusCode::OK, Json(json!({ "username": "nameless" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "User not found" }))),
    }
}

async fn handle_city_lookup(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.lookups.lock().await.push(format!("city:{id}"));
    let name = match id.as_str() {
        "C1" => "Delhi",
        "C2" => "Agra",
        "C3" => {
            // Slowest lookup on purpose: order must not depend on completion order.
            tokio::time::sleep(Duration::from_millis(50)).await;
            "Mathura"
        }
        "C4" => "Vrindavan",
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "error": "City not found" }))),
    };
    (StatusCode::OK, Json(json!({ "city": { "cityName": name, "cityPincode": id } })))
}

async fn handle_create_bus(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.mutations.lock().await.push(RecordedRequest {
        method: "POST",
        path: "/api/bus/add".to_string(),
        body,
    });
    (StatusCode::CREATED, Json(json!({ "message": "Bus added" })))
}

async fn handle_create_city(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let duplicate = body["cityPincode"] == "282001";
    state.mutations.lock().await.push(RecordedRequest {
        method: "POST",
        path: "/api/cities/create".to_string(),
        body,
    });
    if duplicate {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "City already exists" })),
        );
    }
    (StatusCode::CREATED, Json(json!({})))
}

async fn handle_add_stops(
    State(state): State<BackendState>,
    Path(pincode): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    state.mutations.lock().await.push(RecordedRequest {
        method: "PATCH",
        path: format!("/api/cities/add-stops/{pincode}"),
        body,
    });
    StatusCode::OK
}

async fn handle_delete_stop(
    State(state): State<BackendState>,
    Path((pincode, stop_id)): Path<(String, String)>,
) -> StatusCode {
    state.mutations.lock().await.push(RecordedRequest {
        method: "DELETE",
        path: format!("/api/cities/delete-stop/{pincode}/{stop_id}"),
        body: Value::Null,
    });
    StatusCode::OK
}

async fn spawn_backend(state: BackendState) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/bus/list", get(handle_bus_list))
        .route("/api/bus/add", post(handle_create_bus))
        .route("/api/users", get(handle_user_list))
        .route("/api/users/:id", get(handle_user_lookup))
        .route("/api/cities/list", get(handle_city_list))
        .route("/api/cities/city/:id", get(handle_city_lookup))
        .route("/api/cities/create", post(handle_create_city))
        .route("/api/cities/add-stops/:pincode", patch(handle_add_stops))
        .route(
            "/api/cities/delete-stop/:pincode/:stop_id",
            delete(handle_delete_stop),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn client_for(base_url: &str) -> ConsoleClient {
    let api = HttpAdminApi::from_base_url(base_url).expect("valid base url");
    ConsoleClient::new(Arc::new(api))
}

fn sample_bus(id: &str, owner: &str, rest_stops: &[&str]) -> Value {
    json!({
        "_id": format!("rec-{id}"),
        "busId": id,
        "busNumber": format!("KA 01 {id}"),
        "ownerId": owner,
        "busCapacity": 40,
        "source": "C1",
        "destination": "C2",
        "restStops": rest_stops,
        "earningPerDay": 1250.5
    })
}

#[tokio::test]
async fn bus_page_resolves_every_reference() -> Result<()> {
    let state = BackendState::with_buses(json!([sample_bus("B1", "O1", &["C3", "C4"])]));
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let page = client.bus_page(&ListingQuery::buses()).await?;

    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    let bus = &page.items[0];
    assert_eq!(bus.bus.bus_id, "B1");
    assert_eq!(bus.owner_name, "Alice");
    assert_eq!(bus.source_city, "Delhi");
    assert_eq!(bus.destination_city, "Agra");
    assert_eq!(bus.rest_stops_cities, vec!["Mathura", "Vrindavan"]);

    let queries = state.list_queries.lock().await;
    let params = &queries[0];
    assert_eq!(params.get("page").map(String::as_str), Some("1"));
    assert_eq!(params.get("limit").map(String::as_str), Some("10"));
    assert_eq!(params.get("sort").map(String::as_str), Some("busNumber"));
    assert_eq!(params.get("order").map(String::as_str), Some("asc"));
    Ok(())
}

#[tokio::test]
async fn unresolvable_references_fall_back_per_field() -> Result<()> {
    let state = BackendState::with_buses(json!([
        sample_bus("B1", "O2", &["C3", "C9", "C4"]),
        sample_bus("B2", "O3", &[]),
        sample_bus("B3", "", &[]),
    ]));
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let page = client.bus_page(&ListingQuery::buses()).await?;

    let ids: Vec<&str> = page.items.iter().map(|bus| bus.bus.bus_id.as_str()).collect();
    assert_eq!(ids, vec!["B1", "B2", "B3"]);
    assert_eq!(page.items[0].owner_name, UNKNOWN_OWNER);
    assert_eq!(
        page.items[0].rest_stops_cities,
        vec!["Mathura", UNKNOWN_CITY, "Vrindavan"]
    );
    assert_eq!(page.items[1].owner_name, UNKNOWN_OWNER);
    assert_eq!(page.items[1].source_city, "Delhi");
    assert_eq!(page.items[2].owner_name, UNKNOWN_OWNER);

    let lookups = state.lookups.lock().await;
    assert!(!lookups.iter().any(|lookup| lookup == "user:"));
    Ok(())
}

#[tokio::test]
async fn null_references_degrade_to_fallback_text() -> Result<()> {
    let mut broken = sample_bus("B1", "O1", &[]);
    broken["ownerId"] = Value::Null;
    broken["source"] = Value::Null;
    broken["restStops"] = json!(["C3", null]);
    let state = BackendState::with_buses(json!([broken, sample_bus("B2", "O1", &["C4"])]));
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let page = client.bus_page(&ListingQuery::buses()).await?;

    assert_eq!(page.items.len(), 2);
    let first = &page.items[0];
    assert_eq!(first.owner_name, UNKNOWN_OWNER);
    assert_eq!(first.source_city, UNKNOWN_CITY);
    assert_eq!(first.destination_city, "Agra");
    assert_eq!(first.rest_stops_cities, vec!["Mathura", UNKNOWN_CITY]);
    assert_eq!(page.items[1].owner_name, "Alice");
    assert_eq!(page.items[1].rest_stops_cities, vec!["Vrindavan"]);

    let lookups = state.lookups.lock().await;
    assert!(!lookups.iter().any(|lookup| lookup == "user:" || lookup == "city:"));
    Ok(())
}

#[tokio::test]
async fn failed_bus_list_is_reported_with_backend_message() -> Result<()> {
    let state = BackendState {
        fail_bus_list: true,
        ..BackendState::default()
    };
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let err = client
        .bus_page(&ListingQuery::buses())
        .await
        .expect_err("list must fail");

    assert_eq!(
        err.status_code(),
        Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
    );
    assert!(err.to_string().contains("database unavailable"));
    assert!(state.lookups.lock().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn listing_view_commits_latest_page_only() -> Result<()> {
    let state = BackendState::with_buses(json!([sample_bus("B1", "O1", &[])]));
    let base_url = spawn_backend(state).await?;
    let client = client_for(&base_url);

    let mut view = ListingView::new(ListingQuery::buses());
    let first = view.refresh();
    let first_result = client.bus_page(&first.query).await;
    let second = view.toggle_sort_order().expect("order control");
    let second_result = client.bus_page(&second.query).await;

    assert_eq!(
        view.commit(second.generation, second_result),
        listing::CommitOutcome::Applied
    );
    assert_eq!(
        view.commit(first.generation, first_result),
        listing::CommitOutcome::Stale
    );
    assert_eq!(view.rows().len(), 1);
    assert!(view.show_pagination());
    assert_eq!(second.query.to_query_pairs()[3], ("order", "desc".to_string()));
    Ok(())
}

#[tokio::test]
async fn city_and_user_pages_decode_backend_rows() -> Result<()> {
    let state = BackendState::default();
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let cities = client.city_page(&ListingQuery::cities()).await?;
    assert_eq!(cities.items[0].city_name, "Agra");
    assert_eq!(cities.items[0].stops[0].stop_duration, 15);
    assert!(cities.items[0].created_at.is_some());

    let users = client.user_page(&ListingQuery::staff_users()).await?;
    assert_eq!(users.items.len(), 2);
    assert!(!users.items[1].active);

    let queries = state.list_queries.lock().await;
    assert_eq!(queries[0].get("sort").map(String::as_str), Some("createdAt"));
    assert!(queries[0].get("order").is_none());
    assert_eq!(queries[1].get("filter").map(String::as_str), Some("Staff"));
    assert_eq!(queries[1].get("limit").map(String::as_str), Some("5"));
    Ok(())
}

#[tokio::test]
async fn bus_form_options_load_all_pickers() -> Result<()> {
    let base_url = spawn_backend(BackendState::default()).await?;
    let client = client_for(&base_url);

    let options = client.bus_form_options().await;

    assert_eq!(options.owners.len(), 1);
    assert_eq!(options.owners[0].picker_label(), "Alice");
    assert_eq!(options.staff[1].picker_label(), "driver02");
    assert_eq!(options.cities[0].city_ref(), CityId::new("282001"));
    Ok(())
}

#[tokio::test]
async fn bus_form_options_degrade_to_empty_when_backend_is_down() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let client = client_for("http://127.0.0.1:9");

    let options = client.bus_form_options().await;

    assert!(options.owners.is_empty());
    assert!(options.staff.is_empty());
    assert!(options.cities.is_empty());
}

#[tokio::test]
async fn submit_bus_posts_payload_built_from_form() -> Result<()> {
    let state = BackendState::default();
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let mut form = BusForm {
        owner_id: Some(UserId::new("O1")),
        bus_number: "KA 01 F 1234".to_string(),
        bus_capacity: 40,
        source: Some(CityId::new("110001")),
        destination: Some(CityId::new("282001")),
        ..BusForm::default()
    };
    let options = client.bus_form_options().await;
    form.add_staff(&options.staff[0]);
    form.add_rest_stop(&options.cities[0]);

    client.submit_bus(&form).await?;

    let mutations = state.mutations.lock().await;
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].path, "/api/bus/add");
    let body = &mutations[0].body;
    assert_eq!(body["busId"], "KA_01_F_1234");
    assert_eq!(body["ownerId"], "O1");
    assert_eq!(body["staff"], json!(["S1"]));
    assert_eq!(body["restStops"], json!(["282001"]));
    assert_eq!(body["busCapacity"], 40);
    assert_eq!(body["seats"], json!([]));
    Ok(())
}

#[tokio::test]
async fn invalid_forms_never_reach_the_backend() -> Result<()> {
    let state = BackendState::default();
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let err = client
        .submit_bus(&BusForm::default())
        .await
        .expect_err("owner missing");
    assert!(matches!(err, SubmitError::Invalid(FormError::MissingOwner)));

    let city = CityForm {
        city_name: "Agra".to_string(),
        city_pincode: "28".to_string(),
        ..CityForm::default()
    };
    let err = client.submit_city(&city).await.expect_err("bad pincode");
    assert_eq!(err.to_string(), "City Pincode must be a 6-digit number.");

    assert!(state.mutations.lock().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_city_surfaces_backend_rejection() -> Result<()> {
    let state = BackendState::default();
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let mut form = CityForm {
        city_name: "Agra".to_string(),
        city_pincode: "282001".to_string(),
        ..CityForm::default()
    };
    form.draft = StopDraft {
        stop_name: "Taj Mahal".to_string(),
        stop_timings: "10:00".to_string(),
        stop_duration: 30,
    };
    form.add_draft_stop().expect("complete stop");

    let err = client.submit_city(&form).await.expect_err("duplicate city");
    match err {
        SubmitError::Api(api_err) => {
            assert_eq!(api_err.status_code(), Some(reqwest::StatusCode::CONFLICT));
            assert!(api_err.to_string().ends_with("City already exists"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let mutations = state.mutations.lock().await;
    assert_eq!(mutations[0].body["stops"][0]["stopId"], "taj-mahal");
    assert_eq!(mutations[0].body["stops"][0]["stopDuration"], 30);
    Ok(())
}

#[tokio::test]
async fn stop_mutations_hit_pincode_scoped_endpoints() -> Result<()> {
    let state = BackendState::default();
    let base_url = spawn_backend(state.clone()).await?;
    let client = client_for(&base_url);

    let draft = StopDraft {
        stop_name: "Agra Fort".to_string(),
        stop_timings: "09:30".to_string(),
        stop_duration: 20,
    };
    client.add_stop("282001", &draft).await?;
    client.delete_stop("282001", "agra_fort").await?;

    let mutations = state.mutations.lock().await;
    assert_eq!(mutations[0].method, "PATCH");
    assert_eq!(mutations[0].path, "/api/cities/add-stops/282001");
    assert_eq!(
        mutations[0].body,
        json!({ "stops": [{
            "stopId": "agra_fort",
            "stopName": "Agra Fort",
            "stopTimings": "09:30",
            "stopDuration": "20"
        }] })
    );
    assert_eq!(mutations[1].method, "DELETE");
    assert_eq!(mutations[1].path, "/api/cities/delete-stop/282001/agra_fort");
    Ok(())
}

#[test]
fn connect_rejects_unusable_base_url() {
    let settings = ConsoleSettings {
        api_base_url: "ftp://localhost".to_string(),
        ..ConsoleSettings::default()
    };
    let err = ConsoleClient::connect(&settings)
        .err()
        .expect("ftp is not accepted");
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}
