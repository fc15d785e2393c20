//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a fully-resolved [`Config`] (file
//! values merged with CLI and environment overrides) and returns every
//! problem at once as a list of [`ValidationError`] values with per-field
//! suggestions.

use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// HS256 keys shorter than the digest size are rejected.
pub const MIN_SECRET_LEN: usize = 32;

/// Validate a backend base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.query().is_some() || parsed.fragment().is_some() {
                Err("base URL must not carry a query string or fragment".into())
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Cookie names are HTTP tokens: visible ASCII without separators.
pub fn validate_cookie_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("cookie name cannot be empty".into());
    }
    let invalid = name
        .chars()
        .find(|c| !c.is_ascii_graphic() || "()<>@,;:\\\"/[]?={}".contains(*c));
    match invalid {
        Some(c) => Err(format!("cookie name contains invalid character '{c}'")),
        None => Ok(()),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.backend.url.as_deref() {
        None | Some("") => {
            if config.backend.internal_url.is_none() {
                errors.push(ValidationError {
                    field: "backend.url".into(),
                    message: "a backend URL is required".into(),
                    suggestion: Some("set BACKEND_URL or backend.url".into()),
                });
            }
        }
        Some(url) => {
            if let Err(msg) = validate_base_url(url) {
                errors.push(ValidationError {
                    field: "backend.url".into(),
                    message: msg,
                    suggestion: None,
                });
            }
        }
    }

    if let Some(internal) = config.backend.internal_url.as_deref() {
        if let Err(msg) = validate_base_url(internal) {
            errors.push(ValidationError {
                field: "backend.internal_url".into(),
                message: msg,
                suggestion: None,
            });
        }
    }

    if config.backend.timeout == 0 {
        errors.push(ValidationError {
            field: "backend.timeout".into(),
            message: "timeout must be greater than zero".into(),
            suggestion: Some("the default is 10000 ms".into()),
        });
    }

    match config.session.secret.as_deref() {
        None | Some("") => errors.push(ValidationError {
            field: "session.secret".into(),
            message: "a session signing secret is required".into(),
            suggestion: Some("set SESSION_SECRET or session.secret".into()),
        }),
        Some(secret) if secret.len() < MIN_SECRET_LEN => errors.push(ValidationError {
            field: "session.secret".into(),
            message: format!(
                "secret is {} bytes, at least {MIN_SECRET_LEN} required",
                secret.len()
            ),
            suggestion: Some("generate one with `openssl rand -base64 32`".into()),
        }),
        Some(_) => {}
    }

    if let Err(msg) = validate_cookie_name(&config.session.cookie_name) {
        errors.push(ValidationError {
            field: "session.cookie_name".into(),
            message: msg,
            suggestion: None,
        });
    }

    if config.session.max_age == 0 {
        errors.push(ValidationError {
            field: "session.max_age".into(),
            message: "session lifetime must be greater than zero".into(),
            suggestion: None,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let backend = config.backend.url.as_deref().unwrap_or("(unset)");
    let forward = config.backend.forward_base().unwrap_or("(unset)");
    let lines = [
        format!("  backend:  {backend}"),
        format!("  forwards: {forward}"),
        format!("  timeout:  {}ms", config.backend.timeout),
        format!(
            "  session:  cookie '{}', max age {}s{}",
            config.session.cookie_name,
            config.session.max_age,
            if config.session.secure_cookie {
                ", secure"
            } else {
                ""
            }
        ),
    ];
    format!("{path} is valid\n{}", lines.join("\n"))
}
