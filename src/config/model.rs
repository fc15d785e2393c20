//! Serde data structures for the Tollgate configuration file.
//!
//! Contains [`Config`] (the root), [`BackendConfig`] and
//! [`SessionConfig`]. All types derive `Serialize` and `Deserialize`
//! with `deny_unknown_fields` for strict parsing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COOKIE_NAME: &str = "tollgate.session-token";

const fn default_timeout() -> u64 {
    10_000
}

const fn default_max_age() -> u64 {
    86_400
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_default_max_age(v: &u64) -> bool {
    *v == default_max_age()
}

fn is_default_cookie_name(v: &str) -> bool {
    v == DEFAULT_COOKIE_NAME
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Public-facing backend base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Network-internal backend base URL, preferred for forwarding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_url: Option<String>,

    /// Outbound request deadline in milliseconds.
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            internal_url: None,
            timeout: default_timeout(),
        }
    }
}

impl BackendConfig {
    /// Base URL used for forwarded calls, without a trailing slash.
    #[must_use]
    pub fn forward_base(&self) -> Option<&str> {
        self.internal_url
            .as_deref()
            .or(self.url.as_deref())
            .map(|u| u.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    #[serde(
        default = "default_cookie_name",
        skip_serializing_if = "is_default_cookie_name"
    )]
    pub cookie_name: String,

    /// Session lifetime in seconds.
    #[serde(
        default = "default_max_age",
        skip_serializing_if = "is_default_max_age"
    )]
    pub max_age: u64,

    #[serde(default, skip_serializing_if = "is_false")]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            cookie_name: default_cookie_name(),
            max_age: default_max_age(),
            secure_cookie: false,
        }
    }
}
