//! Inbound request to outbound request translation.
//!
//! Bodies are re-encoded according to the caller's content type before
//! they reach the backend: JSON is parsed and re-serialized, URL-encoded
//! forms are decoded and re-encoded, multipart uploads are refused, and
//! anything else is dropped.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use url::form_urlencoded;

use crate::error::ProxyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Multipart,
    Other,
}

/// Lowercased media type without parameters, e.g. `application/json`.
#[must_use]
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

#[must_use]
pub fn classify(content_type: Option<&str>) -> BodyKind {
    match content_type.map(media_type).as_deref() {
        Some("application/json") => BodyKind::Json,
        Some("application/x-www-form-urlencoded") => BodyKind::Form,
        Some("multipart/form-data") => BodyKind::Multipart,
        _ => BodyKind::Other,
    }
}

/// Encode the body to forward, or `None` when nothing should be sent.
pub fn translate_body(
    method: &Method,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Option<Bytes>, ProxyError> {
    if method == Method::GET || method == Method::HEAD {
        return Ok(None);
    }

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    match classify(content_type) {
        BodyKind::Multipart => Err(ProxyError::UnsupportedContentType),
        BodyKind::Json => reencode_json(&body),
        BodyKind::Form => Ok(reencode_form(&body)),
        BodyKind::Other => {
            if !body.is_empty() {
                tracing::debug!(
                    content_type = content_type.unwrap_or("(none)"),
                    bytes = body.len(),
                    "dropping body with unhandled content type"
                );
            }
            Ok(None)
        }
    }
}

fn reencode_json(body: &[u8]) -> Result<Option<Bytes>, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ProxyError::InvalidJson)?;
    let encoded = serde_json::to_vec(&value).map_err(|_| ProxyError::InvalidJson)?;
    Ok(Some(Bytes::from(encoded)))
}

fn reencode_form(body: &[u8]) -> Option<Bytes> {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form_urlencoded::parse(body))
        .finish();
    if encoded.is_empty() {
        None
    } else {
        Some(Bytes::from(encoded))
    }
}

/// `<base>/api<sub_path>` with the caller's query string appended verbatim.
#[must_use]
pub fn target_url(base: &str, sub_path: &str, query: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match query {
        Some(q) => format!("{base}/api{sub_path}?{q}"),
        None => format!("{base}/api{sub_path}"),
    }
}
