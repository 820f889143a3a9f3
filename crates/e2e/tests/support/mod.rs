//! In-process stand-in for the backend, the PostgREST interface and the web
//! app, all served from one axum router on an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use guestcheck_e2e::client::{Targets, TestContext};

pub const ANON_KEY: &str = "test-anon-key";
pub const FALLBACK_USER: &str = "test-user-confirmed-guests";

/// Knobs for simulating misconfigured or partially broken deployments.
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    pub root_message: Option<String>,
    pub drop_created_status_checks: bool,
    pub no_cors: bool,
    /// Table reads succeed without an API key.
    pub public_reads: bool,
    /// `eq.` filters are accepted but not applied.
    pub ignore_filters: bool,
    pub reject_unit_inserts: bool,
    pub reject_guest_names: Vec<String>,
    /// Tables answering 404 as if they did not exist.
    pub hidden_tables: Vec<&'static str>,
    /// Status code `POST /api/status` fails with.
    pub status_create_status: Option<u16>,
    /// Echo a different `client_name` than the one posted.
    pub mangle_client_name: bool,
    /// Fields dropped from the created status check.
    pub omit_status_fields: Vec<&'static str>,
    /// Body served by `GET /api/status` instead of the stored checks.
    pub status_list_body: Option<Value>,
    pub frontend_status: Option<u16>,
}

#[derive(Debug, Default)]
struct Db {
    status_checks: Vec<Value>,
    status_list_requests: usize,
    tables: HashMap<String, Vec<Value>>,
    next_id: i64,
}

impl Db {
    fn rows(&self, table: &str) -> &[Value] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn insert(&mut self, table: &str, mut row: Value) -> Value {
        self.next_id += 1;
        if let Some(obj) = row.as_object_mut() {
            obj.entry("id").or_insert(json!(self.next_id));
            obj.entry("created_at")
                .or_insert(json!(chrono::Utc::now().to_rfc3339()));
        }
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }
}

struct MockState {
    options: MockOptions,
    db: Mutex<Db>,
}

type Shared = Arc<MockState>;

pub struct MockStack {
    pub base_url: String,
    state: Shared,
}

impl MockStack {
    pub async fn start() -> Self {
        Self::with_options(MockOptions::default()).await
    }

    pub async fn with_options(options: MockOptions) -> Self {
        let no_cors = options.no_cors;
        let state = Arc::new(MockState {
            options,
            db: Mutex::new(Db::default()),
        });

        let mut app = Router::new()
            .route("/", get(frontend_index))
            .route("/api/", get(api_root))
            .route("/api/status", get(list_status).post(create_status))
            .route("/rest/v1/", get(rest_root))
            .route("/rest/v1/{table}", get(select_rows).post(insert_row))
            .route("/auth/v1/settings", get(auth_settings))
            .with_state(state.clone());
        if !no_cors {
            app = app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn targets(&self) -> Targets {
        Targets {
            backend_url: Some(self.base_url.clone()),
            supabase_url: Some(self.base_url.clone()),
            anon_key: Some(ANON_KEY.to_string()),
            frontend_url: Some(format!("{}/", self.base_url)),
            fallback_user_id: FALLBACK_USER.to_string(),
        }
    }

    pub fn context(&self) -> Arc<TestContext> {
        Arc::new(TestContext::new(reqwest::Client::new(), self.targets()))
    }

    pub fn add_profile(&self, user_id: &str) {
        self.insert(
            "profiles",
            json!({
                "id": uuid::Uuid::new_v4().to_string(),
                "user_id": user_id,
                "email": format!("{user_id}@example.test"),
            }),
        );
    }

    pub fn add_unit(&self, user_id: &str) -> i64 {
        let row = self.insert(
            "unita_invito",
            json!({ "user_id": user_id, "nome_principale": "Famiglia Esistente" }),
        );
        row["id"].as_i64().expect("unit id")
    }

    /// Insert a guest directly, bypassing the HTTP layer.
    pub fn add_guest(
        &self,
        user_id: &str,
        name: &str,
        group: Option<&str>,
        confirmed: Option<bool>,
    ) {
        let unit = self.add_unit(user_id);
        self.insert(
            "invitati",
            json!({
                "nome_visualizzato": name,
                "gruppo": group,
                "note": null,
                "confermato": confirmed,
                "user_id": user_id,
                "unita_invito_id": unit,
            }),
        );
    }

    /// Number of `GET /api/status` requests served so far.
    pub fn status_list_requests(&self) -> usize {
        self.state.db.lock().expect("mock db").status_list_requests
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state.db.lock().expect("mock db").rows(table).to_vec()
    }

    /// Store `row` as-is apart from a generated id and timestamp.
    pub fn add_row(&self, table: &str, row: Value) -> Value {
        self.insert(table, row)
    }

    fn insert(&self, table: &str, row: Value) -> Value {
        self.state.db.lock().expect("mock db").insert(table, row)
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == ANON_KEY)
}

fn status_code(code: u16) -> StatusCode {
    StatusCode::from_u16(code).expect("valid status code")
}

async fn frontend_index(State(state): State<Shared>) -> Response {
    if let Some(code) = state.options.frontend_status {
        return (status_code(code), Html("<h1>Bad Gateway</h1>")).into_response();
    }
    Html("<!doctype html><html><body><div id=\"root\"></div></body></html>").into_response()
}

// ── Backend ───────────────────────────────────────────────────────────────

async fn api_root(State(state): State<Shared>) -> Json<Value> {
    let message = state.options.root_message.as_deref().unwrap_or("Hello World");
    Json(json!({ "message": message }))
}

async fn list_status(State(state): State<Shared>) -> Json<Value> {
    let mut db = state.db.lock().expect("mock db");
    db.status_list_requests += 1;
    match &state.options.status_list_body {
        Some(body) => Json(body.clone()),
        None => Json(Value::Array(db.status_checks.clone())),
    }
}

async fn create_status(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(code) = state.options.status_create_status {
        return error(status_code(code), "status check could not be stored");
    }
    let Some(name) = body["client_name"].as_str() else {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "client_name is required");
    };
    let name = if state.options.mangle_client_name {
        format!("{name} (altered)")
    } else {
        name.to_string()
    };
    let mut check = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "client_name": name,
        "timestamp": chrono::Utc::now().naive_utc().to_string(),
    });
    if let Some(obj) = check.as_object_mut() {
        for field in &state.options.omit_status_fields {
            obj.remove(*field);
        }
    }
    if !state.options.drop_created_status_checks {
        state.db.lock().expect("mock db").status_checks.push(check.clone());
    }
    Json(check).into_response()
}

// ── PostgREST ─────────────────────────────────────────────────────────────

async fn rest_root(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "No API key found in request");
    }
    Json(json!({ "swagger": "2.0" })).into_response()
}

async fn auth_settings(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "No API key found in request");
    }
    Json(json!({ "external": { "email": true }, "disable_signup": false })).into_response()
}

fn known_table(state: &MockState, table: &str) -> bool {
    matches!(table, "invitati" | "unita_invito" | "profiles")
        && !state.options.hidden_tables.iter().any(|t| *t == table)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn select_rows(
    State(state): State<Shared>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) && !state.options.public_reads {
        return error(StatusCode::UNAUTHORIZED, "No API key found in request");
    }
    if !known_table(&state, &table) {
        return error(StatusCode::NOT_FOUND, "relation does not exist");
    }

    let mut rows = state.db.lock().expect("mock db").rows(&table).to_vec();
    let mut select = None;
    let mut order = None;
    let mut limit = None;
    for (key, value) in params {
        match key.as_str() {
            "select" => select = Some(value),
            "order" => order = Some(value),
            "limit" => limit = value.parse::<usize>().ok(),
            column => {
                let Some(expected) = value.strip_prefix("eq.") else {
                    return error(StatusCode::BAD_REQUEST, "unsupported operator");
                };
                if !state.options.ignore_filters {
                    rows.retain(|row| row.get(column).is_some_and(|v| render(v) == expected));
                }
            }
        }
    }
    if let Some(column) = order {
        rows.sort_by_key(|row| row.get(&column).map(render).unwrap_or_default());
    }
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    if let Some(columns) = select.filter(|s| s != "*") {
        let columns: Vec<&str> = columns.split(',').collect();
        rows = rows
            .into_iter()
            .map(|row| {
                let projected = columns
                    .iter()
                    .filter_map(|c| row.get(*c).map(|v| (c.to_string(), v.clone())))
                    .collect();
                Value::Object(projected)
            })
            .collect();
    }
    Json(Value::Array(rows)).into_response()
}

async fn insert_row(
    State(state): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "No API key found in request");
    }
    if !known_table(&state, &table) {
        return error(StatusCode::NOT_FOUND, "relation does not exist");
    }
    if headers.get("prefer").and_then(|v| v.to_str().ok()) != Some("return=representation") {
        return StatusCode::CREATED.into_response();
    }

    let mut db = state.db.lock().expect("mock db");
    match table.as_str() {
        "unita_invito" if state.options.reject_unit_inserts => {
            return error(
                StatusCode::FORBIDDEN,
                "new row violates row-level security policy for table \"unita_invito\"",
            );
        }
        "invitati" => {
            let name = body["nome_visualizzato"].as_str().unwrap_or_default();
            if state.options.reject_guest_names.iter().any(|n| n == name) {
                return error(StatusCode::BAD_REQUEST, "guest rejected");
            }
            let unit = &body["unita_invito_id"];
            if !db.rows("unita_invito").iter().any(|u| &u["id"] == unit) {
                return error(
                    StatusCode::CONFLICT,
                    "insert or update on table \"invitati\" violates foreign key constraint",
                );
            }
        }
        _ => {}
    }
    let row = db.insert(&table, body);
    (StatusCode::CREATED, Json(json!([row]))).into_response()
}
