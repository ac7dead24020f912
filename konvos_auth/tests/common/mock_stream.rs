//! Axum-based stand-in for the Stream Chat `/users` endpoints
//!
//! Each test starts its own server on an ephemeral port so tests stay independent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde_json::{Value, json};

use konvos_auth::provider::{StreamChatProvider, StreamConfig};

pub const MOCK_API_KEY: &str = "test-api-key";
pub const MOCK_API_SECRET: &str = "test-api-secret";

/// What the mock has seen and stored
#[derive(Clone, Default)]
pub struct MockState {
    pub users: Arc<Mutex<HashMap<String, Value>>>,
    pub auth_headers: Arc<Mutex<Vec<String>>>,
    pub fail: Arc<AtomicBool>,
}

impl MockState {
    fn record(&self, params: &HashMap<String, String>, headers: &HeaderMap) -> Option<Response> {
        if self.fail.load(Ordering::SeqCst) {
            return Some(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"code": -1, "message": "mock failure"})),
                )
                    .into_response(),
            );
        }

        let auth_type_ok = headers
            .get("stream-auth-type")
            .and_then(|v| v.to_str().ok())
            == Some("jwt");
        let key_ok = params.get("api_key").map(String::as_str) == Some(MOCK_API_KEY);
        let Some(auth) = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .filter(|_| auth_type_ok && key_ok)
        else {
            return Some(
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"code": 5, "message": "api_key or auth missing"})),
                )
                    .into_response(),
            );
        };

        self.auth_headers.lock().unwrap().push(auth.to_string());
        None
    }
}

pub struct MockStream {
    pub base_url: String,
    pub state: MockState,
}

impl MockStream {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/users", get(query_users).post(upsert_users))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Stream server");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn provider(&self) -> StreamChatProvider {
        StreamChatProvider::new(StreamConfig {
            api_key: Some(MOCK_API_KEY.to_string()),
            api_secret: Some(MOCK_API_SECRET.to_string()),
            base_url: self.base_url.clone(),
        })
    }

    pub fn seed(&self, id: &str, name: &str, image: &str) {
        self.state.users.lock().unwrap().insert(
            id.to_string(),
            json!({"id": id, "name": name, "image": image, "role": "user"}),
        );
    }

    pub fn user(&self, id: &str) -> Option<Value> {
        self.state.users.lock().unwrap().get(id).cloned()
    }

    pub fn set_fail(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }
}

async fn upsert_users(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = state.record(&params, &headers) {
        return rejection;
    }

    let Some(users) = body.get("users").and_then(Value::as_object) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": 4, "message": "users is required"})),
        )
            .into_response();
    };

    let mut stored = state.users.lock().unwrap();
    for (id, user) in users {
        stored.insert(id.clone(), user.clone());
    }

    Json(json!({"users": users, "duration": "0.50ms"})).into_response()
}

async fn query_users(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = state.record(&params, &headers) {
        return rejection;
    }

    let payload: Value = params
        .get("payload")
        .and_then(|p| serde_json::from_str(p).ok())
        .unwrap_or(Value::Null);
    let wanted = payload
        .pointer("/filter_conditions/id/$eq")
        .and_then(Value::as_str)
        .map(str::to_string);

    let stored = state.users.lock().unwrap();
    let users: Vec<Value> = wanted
        .and_then(|id| stored.get(&id).cloned())
        .into_iter()
        .collect();

    Json(json!({"users": users, "duration": "0.30ms"})).into_response()
}
