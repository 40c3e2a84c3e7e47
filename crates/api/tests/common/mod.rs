//! Shared helpers for API integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so
//! integration tests exercise the same middleware stack (CORS, request
//! ID, timeout, tracing, panic recovery) that production uses.

#![allow(dead_code)] // not every test binary uses every helper

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use entryflow_api::config::ServerConfig;
use entryflow_api::routes;
use entryflow_api::state::AppState;
use entryflow_core::worker::WorkerConfig;

/// Fixed multipart boundary used by the hand-assembled request bodies.
pub const BOUNDARY: &str = "entryflow-test-boundary";

/// Build a test `ServerConfig` rooted in a scratch directory.
///
/// The "worker" is `/bin/echo`, which prints its argument vector and
/// exits 0 -- enough to drive the full staging/launch/stream path
/// without a Python runtime.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        worker: WorkerConfig {
            python_bin: "/bin/echo".into(),
            script: "worker-main".into(),
            project_root: root.to_path_buf(),
        },
        staging_dir: root.join("staging"),
        template_path: root.join("template.xlsx"),
        keep_browser_open: true,
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// One multipart form field: name, optional filename, raw content.
pub struct Field<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

impl<'a> Field<'a> {
    pub fn text(name: &'a str, content: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content: content.as_bytes(),
        }
    }

    pub fn file(name: &'a str, filename: &'a str, content: &'a [u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            content,
        }
    }
}

/// Hand-assemble a `multipart/form-data` body with the fixed boundary.
pub fn multipart_body(fields: &[Field<'_>]) -> Body {
    let mut body = Vec::new();
    for field in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match field.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    field.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    field.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(field.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

/// POST a multipart form to the app.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[Field<'_>],
) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(fields))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into a UTF-8 string (drains streamed bodies).
pub async fn body_string(response: Response<axum::body::Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
