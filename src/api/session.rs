//! Session cookie handling
//!
//! The cookie carries an opaque token; the session itself lives in the
//! configured [`SessionStore`](crate::domain::SessionStore). Tokens rotate
//! every time a user is stored in the session.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::config::SessionConfig;
use crate::domain::session::{Session, SessionChange, SessionRecord, SessionToken};

/// The request's session plus the token it was loaded from
///
/// Extraction never fails. A store that cannot be read yields an anonymous
/// session that still carries the token, so logout can expire the cookie.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: Session,
    pub token: Option<SessionToken>,
    /// The request sent a cookie that names no live session
    pub stale: bool,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self {
            session: Session::anonymous(),
            token: None,
            stale: false,
        }
    }
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_session_token(&parts.headers, &state.session_config.cookie_name)
        else {
            return Ok(Self::anonymous());
        };

        match state.session_store.load(&token).await {
            Ok(Some(record)) => Ok(Self {
                session: Session::restored(record.user),
                token: Some(token),
                stale: false,
            }),
            Ok(None) => {
                debug!("Session cookie does not match a live session");
                Ok(Self {
                    stale: true,
                    ..Self::anonymous()
                })
            }
            Err(e) => {
                warn!(error = %e, "Failed to load session, continuing anonymously");
                Ok(Self {
                    token: Some(token),
                    ..Self::anonymous()
                })
            }
        }
    }
}

/// Persist whatever the handler did to the session, returning the
/// `Set-Cookie` value to send, if any
///
/// An unchanged session still expires a stale cookie.
pub async fn commit_session(
    state: &AppState,
    previous: Option<&SessionToken>,
    stale: bool,
    session: &Session,
) -> Result<Option<HeaderValue>, ApiError> {
    match session.change() {
        SessionChange::Unchanged if stale => {
            expired_session_cookie(&state.session_config).map(Some)
        }
        SessionChange::Unchanged => Ok(None),
        SessionChange::Established => {
            let Some(user) = session.user() else {
                return Ok(None);
            };

            if let Some(previous) = previous {
                destroy_quietly(state, previous).await;
            }

            let config = &state.session_config;
            let token = state.token_generator.generate();
            let record = SessionRecord::new(user.clone(), Utc::now() + session_ttl(config)?);

            state.session_store.save(&token, record).await?;
            debug!(user_id = %user.id, "Session established");

            session_cookie(config, &token).map(Some)
        }
        SessionChange::Cleared => {
            if let Some(previous) = previous {
                destroy_quietly(state, previous).await;
            }

            expired_session_cookie(&state.session_config).map(Some)
        }
    }
}

/// A failed delete only leaves a record behind that expires on its own
async fn destroy_quietly(state: &AppState, token: &SessionToken) {
    if let Err(e) = state.session_store.destroy(token).await {
        warn!(error = %e, "Failed to destroy session");
    }
}

fn session_ttl(config: &SessionConfig) -> Result<Duration, ApiError> {
    i64::try_from(config.ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| ApiError::internal("Session lifetime is out of range"))
}

/// `HttpOnly` cookie carrying the session token
pub fn session_cookie(config: &SessionConfig, token: &SessionToken) -> Result<HeaderValue, ApiError> {
    let cookie = format!(
        "{}={}; Path={}; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name,
        token.as_str(),
        config.path,
        config.ttl_seconds
    );

    finish_cookie(config, cookie)
}

/// Overwrites the session cookie with an empty, already-expired one
pub fn expired_session_cookie(config: &SessionConfig) -> Result<HeaderValue, ApiError> {
    let cookie = format!(
        "{}=; Path={}; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        config.cookie_name, config.path
    );

    finish_cookie(config, cookie)
}

fn finish_cookie(config: &SessionConfig, mut cookie: String) -> Result<HeaderValue, ApiError> {
    if let Some(domain) = &config.domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }

    if config.secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal(format!("Invalid session cookie: {}", e)))
}

/// Token from the named cookie; malformed values count as absent
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .and_then(|(_, value)| SessionToken::parse(value.trim()))
}
