//! `tollgate init`: generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal
//! or fully documented templates. Existing files are never overwritten.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::TollgateError;

pub fn execute(args: &InitArgs) -> Result<(), TollgateError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("tollgate.{}", args.format.extension())));

    if output.exists() {
        return Err(TollgateError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    println!("Set SESSION_SECRET (at least 32 bytes) before running `tollgate run`.");
    Ok(())
}

#[must_use]
pub fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# Tollgate config
# The session secret is read from SESSION_SECRET.

backend:
  url: "http://localhost:8080"
"#;

const YAML_FULL: &str = r#"# Tollgate config
#
# Every value can also be set through a flag or environment variable:
#   backend.url           --backend-url           BACKEND_URL
#   backend.internal_url  --internal-backend-url  INTERNAL_BACKEND_URL
#   backend.timeout       --timeout               REQUEST_TIMEOUT_MS
#   session.secret        --session-secret        SESSION_SECRET
# Flags and environment variables take precedence over this file.

backend:
  # Public backend base URL. Forwarded calls go to <url>/api/<path>.
  url: "http://localhost:8080"
  # Network-internal base URL, used instead of `url` when set.
  # internal_url: "http://backend.internal:3000"
  # Outbound request deadline in ms. Expiry answers 504.
  # timeout: 10000

session:
  # HS256 signing key, at least 32 bytes. Prefer SESSION_SECRET.
  # secret: ""
  cookie_name: "tollgate.session-token"
  # Session lifetime in seconds.
  # max_age: 86400
  # Mark the cookie Secure (serve over HTTPS).
  # secure_cookie: false
"#;

const JSON_MINIMAL: &str = r#"{
  "backend": {
    "url": "http://localhost:8080"
  }
}
"#;

const JSON_FULL: &str = r#"{
  "backend": {
    "url": "http://localhost:8080",
    "timeout": 10000
  },
  "session": {
    "cookie_name": "tollgate.session-token",
    "max_age": 86400,
    "secure_cookie": false
  }
}
"#;

const TOML_MINIMAL: &str = r#"# Tollgate config
# The session secret is read from SESSION_SECRET.

[backend]
url = "http://localhost:8080"
"#;

const TOML_FULL: &str = r#"# Tollgate config
#
# Flags and environment variables (BACKEND_URL, INTERNAL_BACKEND_URL,
# REQUEST_TIMEOUT_MS, SESSION_SECRET) take precedence over this file.

[backend]
# Public backend base URL. Forwarded calls go to <url>/api/<path>.
url = "http://localhost:8080"
# Network-internal base URL, used instead of `url` when set.
# internal_url = "http://backend.internal:3000"
# Outbound request deadline in ms. Expiry answers 504.
# timeout = 10000

[session]
# HS256 signing key, at least 32 bytes. Prefer SESSION_SECRET.
# secret = ""
# cookie_name = "tollgate.session-token"
# max_age = 86400
# secure_cookie = false
"#;
