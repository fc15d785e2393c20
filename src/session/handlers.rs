//! Session endpoints under `/api/auth/session`.
//!
//! - `POST` signs a staff member in by exchanging credentials with the
//!   backend's `/auth/login` for an access token, then stores that token
//!   in a fresh session cookie.
//! - `GET` reports the current session.
//! - `DELETE` clears the session cookie.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ensure_session;
use crate::error::ProxyError;
use crate::proxy::{normalize, translate, upstream};
use crate::server::AppState;

const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub subject: String,
    pub expires_at: u64,
}

pub async fn sign_in(State(state): State<Arc<AppState>>, jar: CookieJar, body: Bytes) -> Response {
    match sign_in_inner(&state, jar, &body).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(status = e.status().as_u16(), error = %e, "sign-in failed");
            e.into_response()
        }
    }
}

async fn sign_in_inner(
    state: &AppState,
    jar: CookieJar,
    body: &[u8],
) -> Result<Response, ProxyError> {
    let credentials: SignInRequest =
        serde_json::from_slice(body).map_err(|_| ProxyError::InvalidJson)?;
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ProxyError::BadRequest("email and password are required"));
    }

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );
    let payload = serde_json::json!({
        "email": credentials.email,
        "password": credentials.password,
    });

    let request = upstream::ForwardRequest {
        method: Method::POST,
        url: translate::target_url(state.backend.base(), LOGIN_PATH, None),
        headers,
        body: Some(Bytes::from(payload.to_string())),
    };

    let upstream_failure = |status: StatusCode| ProxyError::Upstream {
        status,
        path: LOGIN_PATH.to_string(),
        method: Method::POST.to_string(),
    };

    let response = upstream::send(&state.http_client, request, state.backend.timeout())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "login call failed");
            upstream_failure(e.status())
        })?;

    if !response.status.is_success() {
        return Ok(normalize::normalize(&response, LOGIN_PATH, "POST").into_response());
    }

    let login: Value = serde_json::from_slice(&response.body).unwrap_or(Value::Null);
    let Some(access_token) = access_token(&login) else {
        tracing::error!("login response carried no access token");
        return Err(upstream_failure(StatusCode::BAD_GATEWAY));
    };
    let subject = subject(&login).unwrap_or_else(|| credentials.email.trim().to_string());

    let (jar, session) = state
        .sessions
        .establish(jar, &subject, access_token)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to issue session");
            ProxyError::Internal
        })?;

    tracing::info!(subject = %session.subject, "staff signed in");
    Ok((
        jar,
        Json(SessionInfo {
            subject: session.subject,
            expires_at: session.expires_at,
        }),
    )
        .into_response())
}

pub async fn session_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionInfo>, ProxyError> {
    let auth = ensure_session(state.sessions.as_ref(), &headers).await?;
    Ok(Json(SessionInfo {
        subject: auth.subject,
        expires_at: auth.expires_at,
    }))
}

pub async fn sign_out(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    tracing::debug!("session cleared");
    (StatusCode::NO_CONTENT, state.sessions.end(jar))
}

fn access_token(login: &Value) -> Option<&str> {
    ["accessToken", "access_token"]
        .iter()
        .find_map(|key| login.get(key).and_then(Value::as_str))
        .filter(|t| !t.is_empty())
}

fn subject(login: &Value) -> Option<String> {
    let user = login.get("user")?;
    match user.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => user
            .get("email")
            .and_then(Value::as_str)
            .map(String::from),
    }
}
