//! A minimal PostgREST stand-in serving `/rest/v1/events` from memory.
//!
//! It understands exactly the filters the expiration handler sends
//! (`is_expired=eq.false`, `end_datetime=lt.<ts>`, `id=in.(...)`), records every
//! request, and can be told to reject reads or writes.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use chrono::DateTime;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Debug)]
pub struct Row {
    pub id: i64,
    pub title: String,
    pub end_datetime: String,
    pub is_expired: bool,
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
    pub prefer: Option<String>,
}

#[derive(Default)]
struct FakeState {
    rows: Vec<Row>,
    read_error: Option<String>,
    write_error: Option<String>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub fn with_rows(rows: &[(i64, &str, &str, bool)]) -> Self {
        let store = FakeStore::default();
        store.state.lock().unwrap().rows = rows
            .iter()
            .map(|(id, title, end_datetime, is_expired)| Row {
                id: *id,
                title: title.to_string(),
                end_datetime: end_datetime.to_string(),
                is_expired: *is_expired,
            })
            .collect();
        store
    }

    pub fn fail_reads(&self, message: &str) {
        self.state.lock().unwrap().read_error = Some(message.to_string());
    }

    pub fn fail_writes(&self, message: &str) {
        self.state.lock().unwrap().write_error = Some(message.to_string());
    }

    pub fn rows(&self) -> Vec<Row> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn is_expired(&self, id: i64) -> bool {
        self.rows()
            .into_iter()
            .find(|row| row.id == id)
            .map(|row| row.is_expired)
            .unwrap()
    }

    /// Serves the fake on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/rest/v1/events", any(events))
            .with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{address}")
    }
}

fn rejection(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "code": "XX000", "message": message, "details": null, "hint": null })),
    )
        .into_response()
}

async fn events(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    State(store): State<FakeStore>,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let mut state = store.state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.clone(),
        query: query.clone(),
        body: serde_json::from_slice(&body).ok(),
        apikey: header("apikey"),
        authorization: header("authorization"),
        prefer: header("prefer"),
    });

    match method {
        Method::GET => {
            if let Some(message) = state.read_error.clone() {
                return rejection(&message);
            }
            let only_unexpired = query.get("is_expired").map(String::as_str) == Some("eq.false");
            let before = query
                .get("end_datetime")
                .and_then(|filter| filter.strip_prefix("lt."))
                .map(|at| DateTime::parse_from_rfc3339(at).unwrap());
            let matching: Vec<Value> = state
                .rows
                .iter()
                .filter(|row| !(only_unexpired && row.is_expired))
                .filter(|row| match before {
                    Some(before) => DateTime::parse_from_rfc3339(&row.end_datetime).unwrap() < before,
                    None => true,
                })
                .map(|row| json!({ "id": row.id, "title": row.title, "end_datetime": row.end_datetime }))
                .collect();
            Json(matching).into_response()
        }
        Method::PATCH => {
            if let Some(message) = state.write_error.clone() {
                return rejection(&message);
            }
            let ids: Vec<i64> = query
                .get("id")
                .and_then(|filter| filter.strip_prefix("in.("))
                .and_then(|list| list.strip_suffix(')'))
                .map(|list| list.split(',').map(|id| id.parse().unwrap()).collect())
                .unwrap_or_default();
            for row in state.rows.iter_mut().filter(|row| ids.contains(&row.id)) {
                row.is_expired = true;
            }
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
