//! Signed session cookies.
//!
//! A session is `<user-uuid>.<expires-unix>.<mac>` where `mac` is an
//! HMAC-SHA256 over the first two fields, base64url without padding. Nothing is
//! stored server side; a session is valid only while the signature verifies,
//! the expiry is in the future, and the user still exists.

use anyhow::Result;
use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::store::{Store, User};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE_NAME: &str = "planit_session";
pub const MIN_SESSION_KEY_LEN: usize = 32;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
/// Longest session lifetime accepted from configuration: one year.
pub const MAX_SESSION_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session key must be at least 32 bytes")]
    InvalidKey,
    #[error("malformed session token")]
    Malformed,
    #[error("invalid session signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("session expiry is out of range")]
    ExpiryOutOfRange,
}

/// Decoded, verified contents of a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub expires_at_unix: i64,
}

pub struct SessionCodec {
    key: Vec<u8>,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").field("key", &"***").finish()
    }
}

impl SessionCodec {
    /// # Errors
    /// Returns [`SessionError::InvalidKey`] when the key is shorter than [`MIN_SESSION_KEY_LEN`].
    pub fn new(key: &[u8]) -> Result<Self, SessionError> {
        if key.len() < MIN_SESSION_KEY_LEN {
            return Err(SessionError::InvalidKey);
        }
        Ok(Self { key: key.to_vec() })
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, SessionError> {
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| SessionError::InvalidKey)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    /// # Errors
    /// Returns an error only if the key cannot initialize the MAC.
    pub fn issue(&self, user_id: Uuid, expires_at_unix: i64) -> Result<String, SessionError> {
        let payload = format!("{user_id}.{expires_at_unix}");
        let signature = self.mac(&payload)?.finalize().into_bytes();
        Ok(format!(
            "{payload}.{}",
            Base64UrlUnpadded::encode_string(&signature)
        ))
    }

    /// # Errors
    /// Returns the reason the token is not an active session.
    pub fn verify(&self, token: &str, now_unix: i64) -> Result<SessionClaims, SessionError> {
        let (payload, signature) = token.rsplit_once('.').ok_or(SessionError::Malformed)?;
        let (user_id, expires) = payload.split_once('.').ok_or(SessionError::Malformed)?;
        let signature =
            Base64UrlUnpadded::decode_vec(signature).map_err(|_| SessionError::Malformed)?;

        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| SessionError::InvalidSignature)?;

        let user_id = Uuid::parse_str(user_id).map_err(|_| SessionError::Malformed)?;
        let expires_at_unix = expires
            .parse::<i64>()
            .map_err(|_| SessionError::Malformed)?;
        if expires_at_unix <= now_unix {
            return Err(SessionError::Expired);
        }

        Ok(SessionClaims {
            user_id,
            expires_at_unix,
        })
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl_seconds: i64,
    session_cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            session_cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }
}

#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    codec: SessionCodec,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, codec: SessionCodec) -> Self {
        Self { config, codec }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Issue a token and the `Set-Cookie` value that carries it.
    ///
    /// # Errors
    /// Returns an error if the token cannot be signed or the header is invalid.
    pub fn create_session(&self, user_id: Uuid) -> Result<HeaderValue> {
        let expires_at_unix = Utc::now()
            .timestamp()
            .checked_add(self.config.session_ttl_seconds)
            .ok_or(SessionError::ExpiryOutOfRange)?;
        let token = self.codec.issue(user_id, expires_at_unix)?;
        Ok(session_cookie(&self.config, &token)?)
    }
}

/// Build a secure `HttpOnly` cookie for the session token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME && !val.trim().is_empty() {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}

/// Verified session claims from the request cookie, if any.
pub(crate) fn session_claims(headers: &HeaderMap, auth: &AuthState) -> Option<SessionClaims> {
    let token = extract_session_token(headers)?;
    match auth.codec().verify(&token, Utc::now().timestamp()) {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!("Ignoring session cookie: {err}");
            None
        }
    }
}

/// Resolve the session cookie into the current user.
///
/// Returns `Ok(None)` when the cookie is missing, invalid, expired, or names a
/// user that no longer exists.
///
/// # Errors
/// Returns an error only when the store lookup fails.
pub async fn current_user(
    headers: &HeaderMap,
    auth: &AuthState,
    store: &dyn Store,
) -> Result<Option<User>> {
    let Some(claims) = session_claims(headers, auth) else {
        return Ok(None);
    };
    store.find_user_by_id(claims.user_id).await
}
