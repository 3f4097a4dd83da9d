use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "member".to_string()
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct ListFilter {
    pub role: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/malformed", get(malformed))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "data": data }))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "user not found" })))
}

async fn list_users(State(db): State<Db>, Query(filter): Query<ListFilter>) -> Json<Value> {
    let users = db.read().await;
    let mut matching: Vec<User> = users
        .values()
        .filter(|u| filter.role.as_deref().map_or(true, |r| u.role == r))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.full_name.cmp(&b.full_name));
    let count = matching.len();
    Json(json!({ "data": { "users": matching }, "meta": { "count": count } }))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<Value>) {
    let user = User {
        id: Uuid::new_v4(),
        full_name: input.full_name,
        role: input.role,
    };
    db.write().await.insert(user.id, user.clone());
    (StatusCode::CREATED, envelope(json!({ "user": user })))
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let users = db.read().await;
    let user = users.get(&id).ok_or_else(not_found)?;
    Ok(envelope(json!({ "user": user })))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut users = db.write().await;
    let user = users.get_mut(&id).ok_or_else(not_found)?;
    if let Some(full_name) = input.full_name {
        user.full_name = full_name;
    }
    if let Some(role) = input.role {
        user.role = role;
    }
    Ok(envelope(json!({ "user": user })))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut users = db.write().await;
    users.remove(&id).ok_or_else(not_found)?;
    Ok(envelope(json!({ "deleted": { "id": id } })))
}

/// Reflects the request back so clients can inspect what went over the wire.
async fn echo(
    method: Method,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    envelope(json!({
        "method": method.as_str(),
        "query": query,
        "headers": headers,
        "body": body,
    }))
}

async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, envelope(json!({ "status": status.as_u16() })))
}

async fn malformed() -> &'static str {
    "this is not json"
}
