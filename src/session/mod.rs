//! Staff session resolution.
//!
//! The proxy never decides on its own who a caller is. It asks a
//! [`SessionProvider`] whether the inbound request carries a session and
//! whether that session holds a bearer credential for the backend.
//! [`ensure_session`] collapses every negative outcome into a single
//! `401 Unauthorized` so callers cannot tell which check failed.
//!
//! [`jwt::JwtSessionProvider`] is the default provider: sessions live in an
//! HS256-signed cookie. [`handlers`] exposes sign-in, session info and
//! sign-out endpoints on top of it.

pub mod handlers;
pub mod jwt;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

use crate::error::ProxyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
    pub access_token: Option<String>,
    /// Unix timestamp (seconds).
    pub expires_at: u64,
}

impl Session {
    /// The bearer credential, if the session carries a usable one.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// A session that passed [`ensure_session`]: the bearer token is guaranteed.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub subject: String,
    pub bearer: String,
    pub expires_at: u64,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("session provider unavailable: {0}")]
    Unavailable(String),
}

// async_trait keeps the provider object-safe behind Arc<dyn SessionProvider>.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Look up the session attached to a request. `Ok(None)` means the
    /// request carries no session at all.
    async fn lookup(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;

    /// Start a session for `subject`, returning the jar with the session
    /// cookie added.
    fn establish(
        &self,
        jar: CookieJar,
        subject: &str,
        access_token: &str,
    ) -> Result<(CookieJar, Session), SessionError>;

    /// End the session, returning the jar with the session cookie removed.
    fn end(&self, jar: CookieJar) -> CookieJar;
}

/// Resolve the caller's session or fail closed with `401`.
pub async fn ensure_session(
    provider: &dyn SessionProvider,
    headers: &HeaderMap,
) -> Result<Authenticated, ProxyError> {
    let session = match provider.lookup(headers).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            tracing::debug!(provider = provider.name(), "no session on request");
            return Err(ProxyError::Unauthorized);
        }
        Err(e) => {
            tracing::debug!(provider = provider.name(), error = %e, "session lookup failed");
            return Err(ProxyError::Unauthorized);
        }
    };

    let Some(bearer) = session.bearer() else {
        tracing::debug!(
            provider = provider.name(),
            subject = %session.subject,
            "session has no bearer credential"
        );
        return Err(ProxyError::Unauthorized);
    };

    Ok(Authenticated {
        bearer: bearer.to_string(),
        subject: session.subject,
        expires_at: session.expires_at,
    })
}
