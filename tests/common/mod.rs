//! Shared fixtures: a recording mock backend, a running proxy instance,
//! and helpers for minting session cookies.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;

use tollgate::config::model::{BackendConfig, Config, SessionConfig, DEFAULT_COOKIE_NAME};
use tollgate::server::{self, AppState};
use tollgate::session::jwt::{JwtSessionProvider, SessionClaims};

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const BACKEND_TOKEN: &str = "backend-token";

/// A request as the mock backend received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    log: Log,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .fallback(respond)
            .layer(DefaultBodyLimit::disable())
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            log,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("backend received no request")
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn respond(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        headers,
        body: body.clone(),
    });

    let text = [(CONTENT_TYPE, "text/plain")];
    let html = [(CONTENT_TYPE, "text/html")];
    let json_type = [(CONTENT_TYPE, "application/json")];

    match uri.path() {
        "/api/auth/login" => login(&body),
        "/api/users/empty" => StatusCode::NO_CONTENT.into_response(),
        "/api/users/text" => (text, "hello").into_response(),
        "/api/users/blank" => (text, "").into_response(),
        "/api/users/list" => Json(json!([{ "id": 1 }, { "id": 2 }])).into_response(),
        "/api/users/missing" => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
        "/api/users/conflict" => (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email taken", "code": "E1" })),
        )
            .into_response(),
        "/api/users/broken" => {
            (StatusCode::INTERNAL_SERVER_ERROR, html, "<h1>oops</h1>").into_response()
        }
        "/api/users/scalar-error" => {
            (StatusCode::BAD_REQUEST, json_type, "\"boom\"").into_response()
        }
        "/api/users/bad-json" => (json_type, "{not json").into_response(),
        "/api/users/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "late": true })).into_response()
        }
        path => (
            [
                ("x-backend-internal", "secret"),
                (SET_COOKIE.as_str(), "backend=1"),
            ],
            Json(json!({ "ok": true, "path": path })),
        )
            .into_response(),
    }
}

fn login(body: &[u8]) -> Response {
    let creds: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
    match (creds["email"].as_str(), creds["password"].as_str()) {
        (Some("staff@example.com"), Some("hunter2")) => Json(json!({
            "accessToken": BACKEND_TOKEN,
            "user": { "id": 7, "email": "staff@example.com" },
        }))
        .into_response(),
        (Some("tokenless@example.com"), _) => {
            Json(json!({ "user": { "id": 8 } })).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response(),
    }
}

pub fn config_for(backend_url: &str) -> Config {
    Config {
        backend: BackendConfig {
            url: Some(backend_url.to_string()),
            ..BackendConfig::default()
        },
        session: SessionConfig {
            secret: Some(SECRET.into()),
            ..SessionConfig::default()
        },
    }
}

pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestProxy {
    pub async fn start(config: Config) -> Self {
        Self::start_with_body_limit(config, 1_048_576).await
    }

    pub async fn start_with_body_limit(config: Config, max_body: usize) -> Self {
        let state = Arc::new(AppState::new(config, "test").unwrap());
        let router = server::build_router(state, max_body);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A `Cookie` header value carrying a valid session with a bearer token.
pub fn session_cookie() -> String {
    let provider = JwtSessionProvider::new(SECRET.as_bytes(), &SessionConfig::default());
    let (token, _) = provider.issue("staff-7", BACKEND_TOKEN).unwrap();
    format!("{DEFAULT_COOKIE_NAME}={token}")
}

/// A validly signed session that carries no backend credential.
pub fn tokenless_session_cookie() -> String {
    let now = jsonwebtoken::get_current_timestamp();
    let claims = SessionClaims {
        sub: "staff-7".into(),
        access_token: None,
        iat: now,
        exp: now + 3600,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("{DEFAULT_COOKIE_NAME}={token}")
}
