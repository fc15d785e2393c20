//! Authenticated backend forwarding.
//!
//! [`forward_handler`] serves every verb under [`MOUNT_PREFIX`]. Each call
//! resolves the caller's session, checks the sub-path against the
//! [`allowlist`], translates the body ([`translate`]), sends it to the
//! backend with allowlisted [`headers`] and the session's bearer token
//! ([`upstream`]), and returns the [`normalize`]d response.

pub mod allowlist;
pub mod headers;
pub mod normalize;
pub mod translate;
pub mod upstream;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;
use crate::server::AppState;
use crate::session::ensure_session;
use normalize::Normalized;

/// Where the proxy is mounted on the inbound surface.
pub const MOUNT_PREFIX: &str = "/api/server";

/// Strip [`MOUNT_PREFIX`] from a request path. Paths outside the mount
/// yield an empty sub-path, which the allowlist never accepts.
#[must_use]
pub fn sub_path(path: &str) -> &str {
    path.strip_prefix(MOUNT_PREFIX).unwrap_or("")
}

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get(headers::X_CORRELATION_ID)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);
    let start = Instant::now();

    let mut response = match forward(&state, &method, &uri, &req_headers, body).await {
        Ok(normalized) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            #[allow(clippy::cast_possible_truncation)]
            let latency_ms = start.elapsed().as_millis() as u64;
            tracing::info!(
                correlation_id = %correlation_id,
                method = %method,
                path = %uri.path(),
                status = normalized.status.as_u16(),
                latency_ms,
                "request forwarded"
            );
            normalized.into_response()
        }
        Err(e) => {
            if e.is_rejection() {
                state.stats.rejected.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    correlation_id = %correlation_id,
                    method = %method,
                    path = %uri.path(),
                    status = e.status().as_u16(),
                    "request rejected"
                );
            } else {
                state.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    correlation_id = %correlation_id,
                    method = %method,
                    path = %uri.path(),
                    error = %e,
                    "forwarding failed"
                );
            }
            e.into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(headers::X_CORRELATION_ID, value);
    }
    response
}

async fn forward(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    req_headers: &HeaderMap,
    body: Bytes,
) -> Result<Normalized, ProxyError> {
    let auth = ensure_session(state.sessions.as_ref(), req_headers).await?;

    let sub_path = sub_path(uri.path());
    if !allowlist::is_allowed(sub_path) {
        return Err(ProxyError::NotAllowed);
    }

    let body = translate::translate_body(method, req_headers, body)?;
    let outbound_headers =
        headers::build_outbound_headers(req_headers, &auth.bearer).map_err(|e| {
            tracing::debug!(subject = %auth.subject, error = %e, "bearer credential not encodable");
            ProxyError::Unauthorized
        })?;

    let request = upstream::ForwardRequest {
        method: method.clone(),
        url: translate::target_url(state.backend.base(), sub_path, uri.query()),
        headers: outbound_headers,
        body,
    };

    let response = upstream::send(&state.http_client, request, state.backend.timeout())
        .await
        .map_err(|e| {
            tracing::warn!(path = %sub_path, error = %e, "backend call failed");
            ProxyError::Upstream {
                status: e.status(),
                path: sub_path.to_string(),
                method: method.to_string(),
            }
        })?;

    Ok(normalize::normalize(&response, sub_path, method.as_str()))
}
