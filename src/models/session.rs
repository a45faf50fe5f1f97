//! Locally persisted user session.
//!
//! The session is a cached copy of a registration the server confirmed once.
//! It lives in the [`SESSION_COOKIE`](crate::config::SESSION_COOKIE) cookie as
//! URL-encoded JSON and never expires.

use serde::{Deserialize, Serialize};

/// Current version of the stored shape.
pub const SESSION_VERSION: u32 = 1;

fn legacy_version() -> u32 {
    1
}

/// The `{v, username, email}` value kept client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSession {
    /// Shape version; records written before versioning count as 1
    #[serde(default = "legacy_version")]
    pub v: u32,
    pub username: String,
    pub email: String,
}

impl LocalSession {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            v: SESSION_VERSION,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Serialize for storage in a cookie.
    pub fn to_cookie_value(&self) -> String {
        // Serializing a struct of strings cannot fail
        let json = serde_json::to_string(self).unwrap_or_default();
        urlencoding::encode(&json).into_owned()
    }

    /// Parse a stored cookie value. Anything malformed, from another
    /// version, or with empty fields yields `None`.
    pub fn from_cookie_value(raw: &str) -> Option<Self> {
        // The cookie parser may already have percent-decoded the value
        let session: Self = match serde_json::from_str(raw) {
            Ok(session) => session,
            Err(_) => serde_json::from_str(&urlencoding::decode(raw).ok()?).ok()?,
        };
        if session.v != SESSION_VERSION
            || session.username.trim().is_empty()
            || session.email.trim().is_empty()
        {
            return None;
        }
        Some(session)
    }
}

/// Registration state derived from the stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No usable session: the registration prompt is shown
    Unknown,
    /// A session was found and is trusted without a network check
    Returning(LocalSession),
}

impl SessionState {
    pub fn from_cookie(raw: Option<&str>) -> Self {
        match raw.and_then(LocalSession::from_cookie_value) {
            Some(session) => Self::Returning(session),
            None => Self::Unknown,
        }
    }

    pub fn session(&self) -> Option<&LocalSession> {
        match self {
            Self::Returning(session) => Some(session),
            Self::Unknown => None,
        }
    }
}
