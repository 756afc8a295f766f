//! Deterministic HTTP responder used to exercise `json-fetch` end-to-end.
//!
//! Each route returns a fixed status and body so tests can hit every branch
//! of response interpretation over real HTTP. A middleware counts requests
//! per path; `/__hits` reports the counts and is itself not counted.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Body served by `GET /object`.
pub const OBJECT_BODY: &str = r#"{"id":1,"name":"widget","tags":["a","b"]}"#;

/// Typed view of [`OBJECT_BODY`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Widget {
    pub id: u64,
    pub name: String,
    pub tags: Vec<String>,
}

/// What `/echo` saw of the incoming request. `body` is the raw bytes and
/// serializes as a JSON array of numbers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

pub type Hits = Arc<RwLock<BTreeMap<String, u64>>>;

const HITS_PATH: &str = "/__hits";

pub fn app() -> Router {
    let hits: Hits = Arc::default();
    Router::new()
        .route("/object", get(object))
        .route("/array", get(|| json_body("[1,2,3]")))
        .route("/null", get(|| json_body("null")))
        .route("/number", get(|| json_body("42")))
        .route("/string", get(|| json_body(r#""hello""#)))
        .route("/malformed", get(|| json_body("{invalid")))
        .route("/empty", get(|| async { StatusCode::OK }))
        .route("/status/{code}", get(status))
        .route("/redirect", get(redirect))
        .route("/echo", any(echo))
        .route(HITS_PATH, get(list_hits))
        .layer(middleware::from_fn_with_state(hits.clone(), count_hits))
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn count_hits(State(hits): State<Hits>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if path != HITS_PATH {
        *hits.write().await.entry(path.clone()).or_default() += 1;
    }
    tracing::info!(method = %request.method(), %path, "request");
    next.run(request).await
}

async fn json_body(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn object() -> impl IntoResponse {
    json_body(OBJECT_BODY).await
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

async fn redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/object")])
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), value)
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: body.to_vec(),
    })
}

async fn list_hits(State(hits): State<Hits>) -> Json<BTreeMap<String, u64>> {
    Json(hits.read().await.clone())
}
