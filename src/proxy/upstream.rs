//! Outbound calls to the backend REST API.
//!
//! [`send`] performs exactly one request with a deadline and reads the
//! whole body. There is no retry: failures are returned to the caller as
//! [`UpstreamError`] and mapped to `502` / `504` by the orchestrator.

use std::time::{Duration, Instant};

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use super::normalize::BackendResponse;
use crate::config::model::BackendConfig;
use crate::server::HttpClient;

/// Where forwarded requests go and how long they may take.
#[derive(Debug, Clone)]
pub struct Backend {
    base: String,
    timeout: Duration,
}

impl Backend {
    #[must_use]
    pub fn new(base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &BackendConfig) -> Option<Self> {
        config
            .forward_base()
            .map(|base| Self::new(base, Duration::from_millis(config.timeout)))
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Request handed to the backend. Built per call and dropped afterwards.
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid outbound request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("backend did not respond within {0:?}")]
    Timeout(Duration),

    #[error("backend request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("backend body read failed: {0}")]
    Body(#[from] hyper::Error),
}

impl UpstreamError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Build(_) | Self::Transport(_) | Self::Body(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
pub async fn send(
    client: &HttpClient,
    request: ForwardRequest,
    timeout: Duration,
) -> Result<BackendResponse, UpstreamError> {
    let start = Instant::now();
    let mut outbound = hyper::Request::builder()
        .method(request.method)
        .uri(&request.url)
        .body(Full::new(request.body.unwrap_or_default()))?;
    *outbound.headers_mut() = request.headers;

    // The deadline covers the status line and the full body.
    let exchange = async {
        let response = client.request(outbound).await?;
        let status = response.status();
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|r| std::str::from_utf8(r.as_bytes()).ok())
            .map(String::from)
            .or_else(|| status.canonical_reason().map(String::from));
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.into_body().collect().await?.to_bytes();
        Ok::<_, UpstreamError>(BackendResponse {
            status,
            reason,
            content_type,
            body,
        })
    };

    let response = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| UpstreamError::Timeout(timeout))??;

    tracing::debug!(
        url = %request.url,
        status = response.status.as_u16(),
        bytes = response.body.len(),
        latency_ms = start.elapsed().as_millis() as u64,
        "backend responded"
    );

    Ok(response)
}
