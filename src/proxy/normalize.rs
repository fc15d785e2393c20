//! Backend response normalization.
//!
//! The caller always gets either an empty `204` or a JSON body. The raw
//! backend body is first classified into a [`BackendBody`], then
//! [`normalize`] decides in one place whether to forward it, wrap it as
//! `{"raw": ...}`, or replace an unhelpful error body with a synthesized
//! `{message, status, path, method}` object.
//!
//! Objects and arrays count as structured, whatever the status. An error
//! body is replaced only when it carries nothing: no body, an empty object
//! or an empty array, a scalar, or text that is not JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};

use super::translate::media_type;

/// Used when neither the backend body nor its status line offers a message.
pub const FALLBACK_MESSAGE: &str = "HTTP Error";

/// What the backend sent, as seen by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendBody {
    /// Zero-length body.
    Empty,
    /// A JSON object or array.
    Structured(Value),
    /// A JSON string, number, boolean or `null`.
    Scalar(Value),
    /// Non-JSON content, or JSON that failed to parse.
    Unparsed(String),
}

impl BackendBody {
    #[must_use]
    pub fn classify(is_json: bool, body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::Empty;
        }
        let text = String::from_utf8_lossy(body);
        if !is_json {
            return Self::Unparsed(text.into_owned());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Self::Structured(value),
            Ok(value) => Self::Scalar(value),
            Err(_) => Self::Unparsed(text.into_owned()),
        }
    }

    fn is_uninformative(&self) -> bool {
        match self {
            Self::Structured(Value::Object(map)) => map.is_empty(),
            Self::Structured(Value::Array(items)) => items.is_empty(),
            _ => true,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Structured(value) => value,
            Self::Scalar(value) => json!({ "raw": value }),
            Self::Unparsed(text) => json!({ "raw": text }),
            Self::Empty => json!({ "raw": "" }),
        }
    }
}

/// A fully-read backend response.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    /// Reason phrase from the status line, if the backend sent one.
    pub reason: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl BackendResponse {
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().map(media_type).is_some_and(|m| {
            m == "application/json" || m.ends_with("+json")
        })
    }
}

/// The outward response: a status plus an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl IntoResponse for Normalized {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

#[must_use]
pub fn error_body(message: &str, status: StatusCode, path: &str, method: &str) -> Value {
    json!({
        "message": message,
        "status": status.as_u16(),
        "path": path,
        "method": method,
    })
}

#[must_use]
pub fn normalize(response: &BackendResponse, path: &str, method: &str) -> Normalized {
    let status = response.status;
    if status == StatusCode::NO_CONTENT {
        return Normalized { status, body: None };
    }

    let is_json = response.is_json();
    let body = BackendBody::classify(is_json, &response.body);

    // A non-empty object or array, including one with its own `message`, is relayed
    // as-is, so a synthesized message can only come from the status line.
    if status.as_u16() >= 400 && body.is_uninformative() {
        let message = response
            .reason
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(FALLBACK_MESSAGE);
        return Normalized {
            status,
            body: Some(error_body(message, status, path, method)),
        };
    }

    Normalized {
        status,
        body: Some(body.into_value()),
    }
}
