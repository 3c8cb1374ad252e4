//! Authenticated session state.
//!
//! A [`Session`] is created at sign-in and dropped at sign-out. Components that
//! act on behalf of a user receive it explicitly, either from a
//! [`SessionContext`] (one signed-in user, as on a device) or from a
//! [`SessionRegistry`] keyed by access token (many users, as in the server).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{UserId, UserProfile};

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 12 * 60;

/// Longest accepted session lifetime (90 days).
pub const MAX_SESSION_TTL_MINUTES: i64 = 90 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Session expired at {0}")]
    Expired(DateTime<Utc>),
    #[error("No account for {0}")]
    UnknownUser(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub access_token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh session with a random access token.
    ///
    /// An expiry past the representable range saturates at the latest instant.
    pub fn issue(user: UserProfile, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            user,
            access_token: Uuid::new_v4().to_string(),
            issued_at,
            expires_at: issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Fails if the session has expired.
    pub fn validate(&self) -> SessionResult<&Self> {
        if self.is_expired() {
            Err(SessionError::Expired(self.expires_at))
        } else {
            Ok(self)
        }
    }
}

/// The signed-in user of a single client.
#[derive(Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous session with `session`.
    pub fn sign_in(&self, session: Session) {
        info!("User {} signed in", session.user.id);
        *self.current.write() = Some(session);
    }

    /// Drop the session, returning it if one was active.
    pub fn sign_out(&self) -> Option<Session> {
        let previous = self.current.write().take();
        if let Some(ref session) = previous {
            info!("User {} signed out", session.user.id);
        }
        previous
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// The active, unexpired session.
    pub fn require(&self) -> SessionResult<Session> {
        let session = self.current().ok_or(SessionError::NotAuthenticated)?;
        session.validate()?;
        Ok(session)
    }
}

/// Sessions of many users, looked up by access token.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue and register a session for `user`.
    ///
    /// Expired sessions are dropped on the way in, so abandoned tokens do not
    /// accumulate between purges.
    pub fn sign_in(&self, user: UserProfile) -> Session {
        let session = Session::issue(user, self.ttl);
        info!("Issued session for user {}", session.user.id);
        let mut sessions = self.sessions.write();
        let now = Utc::now();
        sessions.retain(|_, s| !s.is_expired_at(now));
        sessions.insert(session.access_token.clone(), session.clone());
        session
    }

    pub fn sign_out(&self, token: &str) -> Option<Session> {
        self.sessions.write().remove(token)
    }

    /// Resolve a token to an unexpired session. Expired sessions are evicted.
    pub fn resolve(&self, token: &str) -> SessionResult<Session> {
        let session = self
            .sessions
            .read()
            .get(token)
            .cloned()
            .ok_or(SessionError::NotAuthenticated)?;

        if let Err(e) = session.validate() {
            self.sessions.write().remove(token);
            return Err(e);
        }
        Ok(session)
    }

    /// Drop every expired session; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }
}
