//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared, immutable state holding the
//! config, backend target, HTTP client, session provider, stats and
//! uptime), [`build_router`] for constructing the Axum router with
//! middleware layers, [`build_http_client`] for the connection-pooled
//! hyper client, and [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, MethodRouter};
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::model::Config;
use crate::config::validation;
use crate::error::{TollgateError, ValidationError};
use crate::health::health_handler;
use crate::proxy::upstream::Backend;
use crate::proxy::{self, MOUNT_PREFIX};
use crate::session::jwt::JwtSessionProvider;
use crate::session::{handlers, SessionProvider};

const MOUNT_ROUTE: &str = "/api/server/{*rest}";
// The catch-all never matches an empty remainder.
const MOUNT_ROOT: &str = "/api/server/";
const SESSION_ROUTE: &str = "/api/auth/session";

#[derive(Debug)]
pub struct Stats {
    pub forwarded: AtomicU64,
    pub failed: AtomicU64,
    pub rejected: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub config: Config,
    pub config_source: String,
    pub backend: Backend,
    pub http_client: HttpClient,
    pub sessions: Arc<dyn SessionProvider>,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    /// Build the state from a config, using the cookie-backed JWT
    /// session provider keyed by `session.secret`.
    pub fn new(config: Config, config_source: impl Into<String>) -> Result<Self, TollgateError> {
        if let Err(errors) = validation::validate(&config) {
            return Err(TollgateError::ConfigValidation { errors });
        }
        let secret = config.session.secret.clone().unwrap_or_default();
        let sessions = Arc::new(JwtSessionProvider::new(secret.as_bytes(), &config.session));
        Self::with_sessions(config, config_source, sessions)
    }

    /// Build the state with an explicit session provider.
    pub fn with_sessions(
        config: Config,
        config_source: impl Into<String>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Result<Self, TollgateError> {
        let backend =
            Backend::from_config(&config.backend).ok_or_else(|| TollgateError::ConfigValidation {
                errors: vec![ValidationError {
                    field: "backend.url".into(),
                    message: "a backend URL is required".into(),
                    suggestion: Some("set BACKEND_URL or backend.url".into()),
                }],
            })?;

        Ok(Self {
            config,
            config_source: config_source.into(),
            backend,
            http_client: build_http_client(),
            sessions,
            start_time: Instant::now(),
            stats: Stats::new(),
        })
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring` as the default.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

fn proxy_methods() -> MethodRouter<Arc<AppState>> {
    get(proxy::forward_handler)
        .post(proxy::forward_handler)
        .patch(proxy::forward_handler)
        .put(proxy::forward_handler)
        .delete(proxy::forward_handler)
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            SESSION_ROUTE,
            get(handlers::session_info)
                .post(handlers::sign_in)
                .delete(handlers::sign_out),
        )
        .route(MOUNT_PREFIX, proxy_methods())
        .route(MOUNT_ROOT, proxy_methods())
        .route(MOUNT_ROUTE, proxy_methods())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
