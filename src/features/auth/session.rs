//! Optimistic bearer-token inspection
//!
//! Tokens are never verified here; the upstream APIs re-verify every forwarded token.
//! This only decodes the payload segment to reject sessions that are already expired
//! or unreadable before any upstream call is made.

use base64::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::modules::upstream::SESSION_EXPIRED_MESSAGE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Token is not a readable JWT")]
    Malformed,

    #[error("Token has no expiry claim")]
    MissingExpiry,

    #[error("Token expired at {0}")]
    Expired(DateTime<Utc>),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        tracing::debug!("Rejected session: {}", err);
        AppError::Unauthorized(SESSION_EXPIRED_MESSAGE.to_string())
    }
}

/// Claims read from the token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: i64,
}

/// Decodes the payload of `token` and checks its expiry against `now`.
pub fn inspect_token(token: &str, now: DateTime<Utc>) -> Result<TokenClaims, SessionError> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) if !payload.is_empty() => payload,
        _ => return Err(SessionError::Malformed),
    };

    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| SessionError::Malformed)?;
    let claims: Value = serde_json::from_slice(&bytes).map_err(|_| SessionError::Malformed)?;
    let Value::Object(claims) = claims else {
        return Err(SessionError::Malformed);
    };

    let exp = claims
        .get("exp")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .ok_or(SessionError::MissingExpiry)?;

    let expires_at = Utc
        .timestamp_opt(exp, 0)
        .single()
        .ok_or(SessionError::Malformed)?;
    if expires_at <= now {
        return Err(SessionError::Expired(expires_at));
    }

    // Subjects arrive as strings or as numeric user ids
    let text = |key: &str| match claims.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    Ok(TokenClaims {
        sub: text("sub"),
        email: text("email"),
        role: text("role"),
        exp,
    })
}

/// The caller's session, valid for the rest of the request
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: String,
    pub claims: TokenClaims,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn from_token(token: &str, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let claims = inspect_token(token, now)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(SessionError::Malformed)?;

        Ok(Self {
            token: token.trim().to_string(),
            claims,
            expires_at,
        })
    }

    /// Raw token for forwarding to the upstream APIs
    pub fn bearer(&self) -> &str {
        &self.token
    }

    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).max(Duration::zero())
    }

    /// Subject of the token, used to namespace uploads
    pub fn user_id(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }
}
