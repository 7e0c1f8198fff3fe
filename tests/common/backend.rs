//! In-process stand-in for the hosted backend: `/auth/v1`, `/rest/v1` and
//! `/storage/v1/object`, enough of each for the HTTP gateways.

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portfolio_admin::config::{AdminConfig, AppConfig, BackendConfig, Environment, HttpConfig};

pub const API_KEY: &str = "test-anon-key";
pub const OWNER_EMAIL: &str = "owner@example.com";
pub const OWNER_PASSWORD: &str = "correct horse";
pub const OWNER_ID: &str = "owner-1";
pub const REFRESH_TOKEN: &str = "refresh-1";

#[derive(Default)]
pub struct MockState {
    pub tables: Mutex<HashMap<String, Vec<Value>>>,
    /// `METHOD path?query` for every request that reached a handler
    pub requests: Mutex<Vec<String>>,
    /// Stored object path, content type, size
    pub uploads: Mutex<Vec<(String, String, usize)>>,
    pub logouts: AtomicU64,
    next_id: AtomicU64,
}

impl MockState {
    pub fn seed(&self, table: &str, row: Value) {
        self.tables.lock().unwrap().entry(table.to_string()).or_default().push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn log(&self, method: &str, path: &str, query: &HashMap<String, String>) {
        let mut pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        pairs.sort();
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {}?{}", method, path, pairs.join("&")));
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/logout", post(logout))
            .route(
                "/rest/v1/:table",
                get(list).post(insert).patch(update).delete(remove),
            )
            .route("/storage/v1/object/*path", post(upload))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    /// Configuration pointing at this backend with its session file in `dir`
    pub fn config(&self, dir: &std::path::Path) -> AppConfig {
        AppConfig {
            environment: Environment::Development,
            backend: BackendConfig {
                url: Some(self.base_url.clone()),
                api_key: Some(API_KEY.to_string()),
                storage_bucket: "site-images".to_string(),
            },
            admin: AdminConfig {
                role: "admin".to_string(),
                session_file: Some(dir.join("session.json")),
            },
            http: HttpConfig {
                timeout_secs: 5,
                log_requests: true,
            },
        }
    }
}

/// A token the backend would issue; `ttl` may be negative for an expired one
pub fn access_token(sub: &str, ttl: Duration, expired: bool) -> String {
    let now = chrono::Utc::now().timestamp();
    let exp = if expired { now - ttl.as_secs() as i64 } else { now + ttl.as_secs() as i64 };
    let claims = json!({ "sub": sub, "exp": exp, "email": OWNER_EMAIL, "role": "authenticated" });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"mock-secret"))
        .expect("token encodes")
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No API key found in request" }))).into_response()
}

fn has_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(API_KEY)
}

fn token_body() -> Value {
    json!({
        "access_token": access_token(OWNER_ID, Duration::from_secs(3600), false),
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": REFRESH_TOKEN,
        "user": { "id": OWNER_ID, "email": OWNER_EMAIL }
    })
}

async fn token(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.log("POST", "/auth/v1/token", &query);
    if !has_key(&headers) {
        return unauthorized();
    }

    let granted = match query.get("grant_type").map(String::as_str) {
        Some("password") => body["email"] == OWNER_EMAIL && body["password"] == OWNER_PASSWORD,
        Some("refresh_token") => body["refresh_token"] == REFRESH_TOKEN,
        _ => false,
    };
    if granted {
        (StatusCode::OK, Json(token_body())).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
        )
            .into_response()
    }
}

async fn logout(State(state): State<Arc<MockState>>) -> StatusCode {
    state.logouts.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

fn matches_filters(row: &Value, query: &HashMap<String, String>) -> bool {
    query.iter().all(|(column, condition)| {
        let Some(expected) = condition.strip_prefix("eq.") else {
            return true;
        };
        match row.get(column) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == expected,
        }
    })
}

fn sort_rows(rows: &mut [Value], order: Option<&String>) {
    let Some(order) = order else { return };
    let keys: Vec<(String, bool)> = order
        .split(',')
        .map(|part| {
            let (column, dir) = part.split_once('.').unwrap_or((part, "asc"));
            (column.to_string(), dir == "desc")
        })
        .collect();
    rows.sort_by(|a, b| {
        for (column, desc) in &keys {
            let ord = match (&a[column], &b[column]) {
                (Value::Number(x), Value::Number(y)) => {
                    x.as_f64().unwrap_or_default().total_cmp(&y.as_f64().unwrap_or_default())
                }
                (x, y) => x.to_string().cmp(&y.to_string()),
            };
            let ord = if *desc { ord.reverse() } else { ord };
            if ord.is_ne() {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
}

async fn list(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.log("GET", &format!("/rest/v1/{}", table), &query);
    if !has_key(&headers) {
        return unauthorized();
    }

    let mut rows: Vec<Value> = state
        .rows(&table)
        .into_iter()
        .filter(|row| matches_filters(row, &query))
        .collect();
    sort_rows(&mut rows, query.get("order"));
    if let Some(limit) = query.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        rows.truncate(limit);
    }
    Json(Value::Array(rows)).into_response()
}

async fn insert(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.log("POST", &format!("/rest/v1/{}", table), &HashMap::new());
    if !has_key(&headers) {
        return unauthorized();
    }

    let Value::Array(rows) = body else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "expected an array" }))).into_response();
    };
    let mut stored = Vec::new();
    for mut row in rows {
        if table == "projects" && row.get("title").map_or(true, Value::is_null) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "null value in column \"title\" violates not-null constraint" })),
            )
                .into_response();
        }
        let n = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        row["id"] = json!(format!("{}-{}", table, n));
        state.seed(&table, row.clone());
        stored.push(row);
    }
    (StatusCode::CREATED, Json(Value::Array(stored))).into_response()
}

async fn update(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.log("PATCH", &format!("/rest/v1/{}", table), &query);
    if !has_key(&headers) {
        return unauthorized();
    }

    let mut tables = state.tables.lock().unwrap();
    let mut updated = Vec::new();
    for row in tables.entry(table).or_default().iter_mut() {
        if matches_filters(row, &query) {
            if let (Some(target), Some(fields)) = (row.as_object_mut(), body.as_object()) {
                for (k, v) in fields {
                    target.insert(k.clone(), v.clone());
                }
            }
            updated.push(row.clone());
        }
    }
    Json(Value::Array(updated)).into_response()
}

async fn remove(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.log("DELETE", &format!("/rest/v1/{}", table), &query);
    if !has_key(&headers) {
        return unauthorized();
    }

    let mut tables = state.tables.lock().unwrap();
    let rows = tables.entry(table).or_default();
    let (deleted, kept): (Vec<Value>, Vec<Value>) =
        rows.drain(..).partition(|row| matches_filters(row, &query));
    *rows = kept;
    Json(Value::Array(deleted)).into_response()
}

async fn upload(
    State(state): State<Arc<MockState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.log("POST", &format!("/storage/v1/object/{}", path), &HashMap::new());
    if !has_key(&headers) {
        return unauthorized();
    }

    let mut uploads = state.uploads.lock().unwrap();
    if uploads.iter().any(|(p, _, _)| *p == path) {
        return (StatusCode::CONFLICT, Json(json!({ "message": "The resource already exists" }))).into_response();
    }
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    uploads.push((path.clone(), content_type, body.len()));
    Json(json!({ "Key": path })).into_response()
}
