//! Integration tests for the IT Org portal client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p itorg-integration-tests
//! ```
//!
//! The tests need no external services: [`FakeApi`] serves the portal's HTTP
//! surface from memory on an ephemeral loopback port, records every request
//! it receives, and can be told to fail list or mutation calls.
//!
//! Request bodies are validated against the core draft types, the way the
//! real API validates them against its input schemas, so a client that sends
//! a misspelled status gets a 422 here too.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use itorg_client::{ApiClient, ClientConfig, SessionStore};
use itorg_core::{AssetDraft, ProjectDraft, ResourceKind, TicketDraft};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// One request as seen by the fake API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Raw `Authorization` header, if sent.
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Store {
    next_id: HashMap<ResourceKind, i64>,
    records: HashMap<ResourceKind, BTreeMap<i64, Value>>,
    requests: Vec<RecordedRequest>,
    last_body: Option<Value>,
}

#[derive(Default)]
struct FakeState {
    store: Mutex<Store>,
    fail_lists: AtomicBool,
    fail_mutations: AtomicBool,
}

impl FakeState {
    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("fake API store poisoned")
    }
}

/// In-process stand-in for the portal API.
pub struct FakeApi {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeApi {
    /// Bind to an ephemeral loopback port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState::default());
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake API listener");
        let addr = listener.local_addr().expect("fake API local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve fake API") });

        tracing::debug!(%addr, "Fake portal API listening");
        Self { addr, state }
    }

    /// Base URL to point a client at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client for this server with a fresh in-memory session.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.client_with_session(Arc::new(SessionStore::in_memory()))
    }

    /// A client for this server using `session`.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client_with_session(&self, session: Arc<SessionStore>) -> ApiClient {
        let config = ClientConfig::for_endpoint(&self.base_url(), "unused-session.json")
            .expect("fake API base URL is valid");
        ApiClient::new(&config, session).expect("build API client")
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.store().requests.clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.store().requests.len()
    }

    /// JSON body of the most recent create or update.
    #[must_use]
    pub fn last_body(&self) -> Option<Value> {
        self.state.store().last_body.clone()
    }

    /// Stored records of `kind`, in id order.
    #[must_use]
    pub fn records(&self, kind: ResourceKind) -> Vec<Value> {
        self.state
            .store()
            .records
            .get(&kind)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Insert a record directly, bypassing HTTP. Returns its id.
    pub fn seed(&self, kind: ResourceKind, fields: &Value) -> i64 {
        let mut store = self.state.store();
        insert(&mut store, kind, fields)
    }

    /// Make `GET /{collection}` answer 500 until turned off.
    pub fn fail_lists(&self, fail: bool) {
        self.state.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Make create, update and delete answer 500 until turned off.
    pub fn fail_mutations(&self, fail: bool) {
        self.state.fail_mutations.store(fail, Ordering::SeqCst);
    }
}

fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/{collection}", get(list).post(create))
        .route("/{collection}/{id}", put(update).delete(remove))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            record_request,
        ))
        .with_state(state)
}

async fn record_request(
    State(state): State<Arc<FakeState>>,
    request: Request,
    next: Next,
) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_owned),
        authorization: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };
    state.store().requests.push(recorded);
    next.run(request).await
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn kind_of(collection: &str) -> Result<ResourceKind, Response> {
    ResourceKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.collection() == collection)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Not Found"))
}

/// Validate `body` against the kind's draft type and return the normalized
/// creatable fields.
fn creatable_fields(kind: ResourceKind, body: Value) -> Result<Value, Response> {
    let normalized = match kind {
        ResourceKind::Project => serde_json::from_value::<ProjectDraft>(body)
            .and_then(serde_json::to_value),
        ResourceKind::Ticket => serde_json::from_value::<TicketDraft>(body)
            .and_then(serde_json::to_value),
        ResourceKind::Asset => serde_json::from_value::<AssetDraft>(body)
            .and_then(serde_json::to_value),
    };
    normalized.map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))
}

fn now() -> Value {
    json!(chrono::Utc::now().naive_utc())
}

fn insert(store: &mut Store, kind: ResourceKind, fields: &Value) -> i64 {
    let next = store.next_id.entry(kind).or_insert(1);
    let id = *next;
    *next += 1;

    let mut record = Map::new();
    record.insert("id".to_string(), json!(id));
    if let Value::Object(fields) = fields {
        record.extend(fields.clone());
    }
    record.insert("created_at".to_string(), now());
    record.insert("updated_at".to_string(), now());

    store
        .records
        .entry(kind)
        .or_default()
        .insert(id, Value::Object(record));
    id
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct LoginQuery {
    email: Option<String>,
}

async fn login(Query(query): Query<LoginQuery>) -> Response {
    match query.email {
        Some(email) if email.contains('@') => {
            Json(json!({ "token": format!("demo-token-{email}") })).into_response()
        }
        _ => error(StatusCode::BAD_REQUEST, "Invalid email"),
    }
}

async fn list(State(state): State<Arc<FakeState>>, Path(collection): Path<String>) -> Response {
    let kind = match kind_of(&collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    if state.fail_lists.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "list unavailable");
    }

    let records: Vec<Value> = state
        .store()
        .records
        .get(&kind)
        .map(|records| records.values().cloned().collect())
        .unwrap_or_default();
    Json(records).into_response()
}

async fn create(
    State(state): State<Arc<FakeState>>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let kind = match kind_of(&collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    if state.fail_mutations.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    let fields = match creatable_fields(kind, body.clone()) {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let mut store = state.store();
    store.last_body = Some(body);
    let id = insert(&mut store, kind, &fields);
    let created = store
        .records
        .get(&kind)
        .and_then(|records| records.get(&id))
        .cloned()
        .unwrap_or(Value::Null);
    Json(created).into_response()
}

async fn update(
    State(state): State<Arc<FakeState>>,
    Path((collection, id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Response {
    let kind = match kind_of(&collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    if state.fail_mutations.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    let fields = match creatable_fields(kind, body.clone()) {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let mut store = state.store();
    store.last_body = Some(body);
    let Some(Value::Object(record)) = store.records.get_mut(&kind).and_then(|r| r.get_mut(&id))
    else {
        return error(StatusCode::NOT_FOUND, "Not found");
    };
    if let Value::Object(fields) = fields {
        record.extend(fields);
    }
    record.insert("updated_at".to_string(), now());
    Json(Value::Object(record.clone())).into_response()
}

async fn remove(
    State(state): State<Arc<FakeState>>,
    Path((collection, id)): Path<(String, i64)>,
) -> Response {
    let kind = match kind_of(&collection) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    if state.fail_mutations.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }

    let removed = state
        .store()
        .records
        .get_mut(&kind)
        .and_then(|records| records.remove(&id));
    match removed {
        Some(_) => Json(json!({ "ok": true })).into_response(),
        None => error(StatusCode::NOT_FOUND, "Not found"),
    }
}
