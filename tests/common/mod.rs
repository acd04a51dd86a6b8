//! Shared fixtures: sample records and an in-process fake of the REST API.
#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use restaurant_list::model::{PriceRange, RestaurantDraft, RestaurantId, RestaurantRecord};

pub fn record(id: u64, name: &str) -> RestaurantRecord {
    RestaurantRecord {
        id: RestaurantId(id),
        name: name.to_string(),
        cuisine_type: "Japanese".to_string(),
        image_url: "https://x/y.jpg".to_string(),
        location: "Tokyo".to_string(),
        rating: 5,
        description: None,
        price_range: PriceRange::Moderate,
    }
}

pub fn tako_draft() -> RestaurantDraft {
    record(0, "Tako").to_draft()
}

// =============================================================================
// FAKE REST API
// =============================================================================

#[derive(Default)]
struct FakeState {
    records: BTreeMap<u64, Map<String, Value>>,
    next_id: u64,
    list_calls: usize,
    /// Answer for the next request, whatever its route.
    fail_next: Option<(StatusCode, Option<Value>)>,
}

/// An in-memory `/restaurants` server.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    /// Binds to an ephemeral port and returns the base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/restaurants", get(list).post(create))
            .route(
                "/restaurants/{id}",
                get(get_one).patch(update).delete(delete),
            )
            .with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// The next request fails with `status`; `body` of `None` sends plain text.
    pub fn fail_next(&self, status: StatusCode, body: Option<Value>) {
        self.state.lock().unwrap().fail_next = Some((status, body));
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    /// The stored fields of record `id`, as the server would return them.
    pub fn stored(&self, id: u64) -> Option<Map<String, Value>> {
        self.state.lock().unwrap().records.get(&id).cloned()
    }

    pub fn seed(&self, draft: &RestaurantDraft) -> u64 {
        let Value::Object(fields) = serde_json::to_value(draft).unwrap() else {
            unreachable!()
        };
        self.state.lock().unwrap().insert(fields)
    }

    fn take_failure(&self) -> Option<Response> {
        let (status, body) = self.state.lock().unwrap().fail_next.take()?;
        Some(match body {
            Some(body) => (status, Json(body)).into_response(),
            None => (status, "boom").into_response(),
        })
    }
}

impl FakeState {
    fn insert(&mut self, mut fields: Map<String, Value>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        fields.insert("id".to_string(), json!(id));
        self.records.insert(id, fields);
        id
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Restaurant not found" })),
    )
        .into_response()
}

async fn list(State(api): State<FakeApi>) -> Response {
    if let Some(failure) = api.take_failure() {
        return failure;
    }
    let mut state = api.state.lock().unwrap();
    state.list_calls += 1;
    let all: Vec<Value> = state.records.values().cloned().map(Value::Object).collect();
    Json(all).into_response()
}

async fn get_one(State(api): State<FakeApi>, Path(id): Path<u64>) -> Response {
    if let Some(failure) = api.take_failure() {
        return failure;
    }
    let state = api.state.lock().unwrap();
    match state.records.get(&id) {
        Some(fields) => Json(Value::Object(fields.clone())).into_response(),
        None => not_found(),
    }
}

async fn create(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = api.take_failure() {
        return failure;
    }
    let Value::Object(fields) = body else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": [] }))).into_response();
    };
    let mut state = api.state.lock().unwrap();
    let id = state.insert(fields);
    let created = Value::Object(state.records[&id].clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update(
    State(api): State<FakeApi>,
    Path(id): Path<u64>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Some(failure) = api.take_failure() {
        return failure;
    }
    let mut state = api.state.lock().unwrap();
    let Some(fields) = state.records.get_mut(&id) else {
        return not_found();
    };
    // Stored as sent, so a cleared description comes back as "".
    fields.extend(body);
    Json(Value::Object(fields.clone())).into_response()
}

async fn delete(State(api): State<FakeApi>, Path(id): Path<u64>) -> Response {
    if let Some(failure) = api.take_failure() {
        return failure;
    }
    match api.state.lock().unwrap().records.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}
