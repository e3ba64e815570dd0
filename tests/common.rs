#![allow(dead_code)]
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use concordia_house::{
    config::{Config, Environment},
    models::NewRecord,
    routes::router,
    state::AppState,
    store::{Store, StoreError},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub fn production_app<S: Store>(store: S) -> Router {
    router(AppState::new(store, Config::default()))
}

pub fn development_app<S: Store>(store: S) -> Router {
    let config = Config {
        environment: Environment::Development,
        ..Config::default()
    };
    router(AppState::new(store, config))
}

/// Store whose every insert fails, as if Postgres were down.
#[derive(Clone)]
pub struct UnavailableStore;

impl Store for UnavailableStore {
    async fn create(&self, _record: NewRecord) -> Result<Uuid, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Store that panics on insert, to exercise the fallback view.
#[derive(Clone)]
pub struct PanickingStore;

impl Store for PanickingStore {
    async fn create(&self, _record: NewRecord) -> Result<Uuid, StoreError> {
        panic!("store exploded")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn post_raw(app: &Router, path: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, path: &str, body: &Value) -> (StatusCode, Value) {
    let (status, text) = post_raw(app, path, &body.to_string()).await;
    (status, serde_json::from_str(&text).unwrap())
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"].as_str().unwrap().parse().unwrap()
}

pub fn jane_application() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@x.com",
        "phone": "0821234567",
        "roomType": "single",
        "course": "BCom",
        "yearOfStudy": "1",
        "nsfasFunded": "yes"
    })
}

pub fn noise_incident() -> Value {
    json!({
        "date": "2026-03-14",
        "time": "22:15",
        "location": "Block B, second floor",
        "description": "Loud music well after quiet hours",
        "type": "noise",
        "reporterName": "Sam Mokoena",
        "reporterContact": "0820000000"
    })
}

pub fn waitlist_interest() -> Value {
    json!({
        "name": "Lwazi Dube",
        "email": "lwazi@example.com",
        "phone": "0831112222",
        "preferredDate": "2027-01-15"
    })
}

pub fn food_suggestion() -> Value {
    json!({
        "name": "Thandi",
        "email": "thandi@example.com",
        "category": "food",
        "suggestion": "A vegetarian option on Fridays would be great"
    })
}

pub fn without(payload: &Value, field: &str) -> Value {
    let mut payload = payload.clone();
    payload.as_object_mut().unwrap().remove(field);
    payload
}

pub fn with(payload: &Value, field: &str, value: Value) -> Value {
    let mut payload = payload.clone();
    payload[field] = value;
    payload
}
