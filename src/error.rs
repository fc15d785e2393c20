//! Unified error types for Tollgate.
//!
//! Defines [`TollgateError`] (startup and CLI failures) and
//! [`ValidationError`] for config validation failures. Both use
//! `thiserror` for `Display` and `Error` derives. Error messages
//! include contextual hints to guide the user toward a fix.
//!
//! [`ProxyError`] covers request-path failures. It renders as a JSON
//! response with a guaranteed `message` field instead of ending the process.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::proxy::normalize;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TollgateError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProxyError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not allowed")]
    NotAllowed,

    #[error("Unsupported content-type")]
    UnsupportedContentType,

    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("{0}")]
    BadRequest(&'static str),

    /// The backend could not be reached or did not answer in time.
    #[error("{} for {method} {path}", status.canonical_reason().unwrap_or("HTTP Error"))]
    Upstream {
        status: StatusCode,
        path: String,
        method: String,
    },

    #[error("Internal Server Error")]
    Internal,
}

impl ProxyError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotAllowed => StatusCode::FORBIDDEN,
            Self::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InvalidJson | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the request was refused before reaching the backend.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Upstream { .. } | Self::Internal)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Upstream { path, method, .. } => normalize::error_body(
                status.canonical_reason().unwrap_or(normalize::FALLBACK_MESSAGE),
                status,
                path,
                method,
            ),
            other => serde_json::json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ProxyError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn rejections_carry_fixed_messages() {
        let cases = [
            (ProxyError::Unauthorized, 401, "Unauthorized"),
            (ProxyError::NotAllowed, 403, "Not allowed"),
            (ProxyError::UnsupportedContentType, 415, "Unsupported content-type"),
            (ProxyError::InvalidJson, 400, "Invalid JSON body"),
        ];
        for (err, code, message) in cases {
            let (status, body) = body_json(err).await;
            assert_eq!(status.as_u16(), code);
            assert_eq!(body, serde_json::json!({ "message": message }));
        }
    }

    #[tokio::test]
    async fn upstream_failure_uses_error_shape() {
        let (status, body) = body_json(ProxyError::Upstream {
            status: StatusCode::GATEWAY_TIMEOUT,
            path: "/users".into(),
            method: "GET".into(),
        })
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            body,
            serde_json::json!({
                "message": "Gateway Timeout",
                "status": 504,
                "path": "/users",
                "method": "GET",
            })
        );
    }

    #[test]
    fn rejection_classification() {
        assert!(ProxyError::NotAllowed.is_rejection());
        assert!(!ProxyError::Internal.is_rejection());
        assert!(!ProxyError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            path: String::new(),
            method: String::new(),
        }
        .is_rejection());
    }

    #[test]
    fn validation_error_includes_suggestion() {
        let err = ValidationError {
            field: "backend.url".into(),
            message: "backend URL is required".into(),
            suggestion: Some("set BACKEND_URL".into()),
        };
        assert_eq!(
            err.to_string(),
            "  backend.url: backend URL is required (set BACKEND_URL)"
        );
    }

    #[test]
    fn config_validation_lists_every_error() {
        let err = TollgateError::ConfigValidation {
            errors: vec![
                ValidationError {
                    field: "a".into(),
                    message: "first".into(),
                    suggestion: None,
                },
                ValidationError {
                    field: "b".into(),
                    message: "second".into(),
                    suggestion: None,
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("a: first"));
        assert!(text.contains("b: second"));
    }
}
