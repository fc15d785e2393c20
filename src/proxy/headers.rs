//! Header allowlisting for forwarded requests.
//!
//! [`pick_allowed_headers`] keeps only the caller headers the backend is
//! allowed to see. [`build_outbound_headers`] adds the session's bearer
//! credential on top (always replacing any caller-supplied
//! `Authorization`) together with a `no-store` cache directive.
//!
//! Nothing flows back the other way: backend response headers are read
//! for content-type detection only and are never copied to the caller.

use axum::http::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
pub const X_CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");

/// Caller headers that survive forwarding.
pub static REQUEST_HEADER_ALLOWLIST: [HeaderName; 2] = [CONTENT_TYPE, X_API_KEY];

#[must_use]
pub fn pick_allowed_headers(original: &HeaderMap) -> HeaderMap {
    let mut picked = HeaderMap::new();
    for name in &REQUEST_HEADER_ALLOWLIST {
        for value in original.get_all(name) {
            picked.append(name.clone(), value.clone());
        }
    }
    picked
}

pub fn build_outbound_headers(
    original: &HeaderMap,
    bearer: &str,
) -> Result<HeaderMap, axum::http::header::InvalidHeaderValue> {
    let mut headers = pick_allowed_headers(original);

    let mut authorization = HeaderValue::from_str(&format!("Bearer {bearer}"))?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok(headers)
}
