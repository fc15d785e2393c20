//! Cookie-carried, HS256-signed session tokens.

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{Session, SessionError, SessionProvider};
use crate::config::model::SessionConfig;

const SECURE_PREFIX: &str = "__Secure-";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

pub struct JwtSessionProvider {
    cookie_name: String,
    max_age: u64,
    secure_cookie: bool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionProvider {
    #[must_use]
    pub fn new(secret: &[u8], config: &SessionConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            max_age: config.max_age,
            secure_cookie: config.secure_cookie,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Sign a session token for `subject` valid for the configured max age.
    pub fn issue(
        &self,
        subject: &str,
        access_token: &str,
    ) -> Result<(String, Session), SessionError> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = SessionClaims {
            sub: subject.to_string(),
            access_token: Some(access_token.to_string()),
            iat: now,
            exp: now + self.max_age,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, claims.into()))
    }

    /// Verify signature and expiry of a session token.
    pub fn verify(&self, token: &str) -> Result<Session, SessionError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims.into())
    }

    fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let jar = CookieJar::from_headers(headers);
        jar.get(&self.cookie_name)
            .or_else(|| jar.get(&format!("{SECURE_PREFIX}{}", self.cookie_name)))
            .map(|c| c.value().to_string())
    }
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject: claims.sub,
            access_token: claims.access_token,
            expires_at: claims.exp,
        }
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    fn name(&self) -> &'static str {
        "jwt-cookie"
    }

    async fn lookup(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        match self.token_from_headers(headers) {
            Some(token) => self.verify(&token).map(Some),
            None => Ok(None),
        }
    }

    fn establish(
        &self,
        jar: CookieJar,
        subject: &str,
        access_token: &str,
    ) -> Result<(CookieJar, Session), SessionError> {
        let (token, session) = self.issue(subject, access_token)?;
        let cookie = Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie);
        Ok((jar.add(cookie), session))
    }

    fn end(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((self.cookie_name.clone(), "")).path("/"))
    }
}
