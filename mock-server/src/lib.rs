//! Scripted echo backend for exercising the request layer over real HTTP.
//!
//! Every request outside `/_mock` is recorded and answered with a JSON echo
//! of what arrived. The status of each answer comes from a script queue set
//! through `/_mock/script`; when the queue is empty the answer is 200.

use std::{collections::VecDeque, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// What the backend saw for one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recorded {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Script {
    pub statuses: Vec<u16>,
}

#[derive(Default)]
pub struct Backend {
    script: VecDeque<u16>,
    recorded: Vec<Recorded>,
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::default()));
    Router::new()
        .route("/_mock/script", post(set_script))
        .route("/_mock/requests", get(list_requests).delete(clear_requests))
        .fallback(echo)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn set_script(State(db): State<Db>, Json(script): Json<Script>) -> StatusCode {
    tracing::debug!(statuses = ?script.statuses, "Script replaced");
    db.write().await.script = script.statuses.into();
    StatusCode::NO_CONTENT
}

async fn list_requests(State(db): State<Db>) -> Json<Vec<Recorded>> {
    Json(db.read().await.recorded.clone())
}

async fn clear_requests(State(db): State<Db>) -> StatusCode {
    db.write().await.recorded.clear();
    StatusCode::NO_CONTENT
}

async fn echo(
    State(db): State<Db>,
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Recorded>) {
    let recorded = Recorded {
        id: Uuid::new_v4(),
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect(),
        body,
    };

    let mut backend = db.write().await;
    let status = backend.script.pop_front().unwrap_or(200);
    backend.recorded.push(recorded.clone());
    tracing::debug!(method = %recorded.method, path = %recorded.path, status, "Echoed request");

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(recorded))
}
