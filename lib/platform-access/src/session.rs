//! Session management for authenticated principals.
//!
//! A session is created after a successful OIDC login and binds a cookie
//! value to the principal the identity provider vouched for. Sessions do not
//! cache roles; roles are resolved on every query so allow-list changes take
//! effect immediately.

use crate::error::AuthenticationError;
use crate::principal::Principal;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rootcause::Report;
use serde::{Deserialize, Serialize};

/// Unique identifier for a session.
///
/// Session IDs are opaque strings generated during session creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session ID from a string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An active authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    principal: Principal,
    /// Display name from the `name` or `preferred_username` claim.
    display_name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    /// OIDC access token (for API calls that need it).
    access_token: Option<String>,
    /// OIDC refresh token (for token refresh).
    refresh_token: Option<String>,
}

impl Session {
    /// Creates a new session valid for `duration` from now.
    #[must_use]
    pub fn new(id: SessionId, principal: Principal, duration: Duration) -> Self {
        let now = Utc::now();
        Self::restore(id, principal, now, now + duration)
    }

    /// Rebuilds a session from stored timestamps.
    #[must_use]
    pub fn restore(
        id: SessionId,
        principal: Principal,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            principal,
            display_name: None,
            email: None,
            created_at,
            expires_at,
            access_token: None,
            refresh_token: None,
        }
    }

    /// Attaches profile claims.
    #[must_use]
    pub fn with_profile(mut self, display_name: Option<String>, email: Option<String>) -> Self {
        self.display_name = display_name;
        self.email = email;
        self
    }

    /// Attaches OIDC tokens.
    #[must_use]
    pub fn with_tokens(mut self, access_token: Option<String>, refresh_token: Option<String>) -> Self {
        self.access_token = access_token;
        self.refresh_token = refresh_token;
        self
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Persistence for sessions.
///
/// Implemented over Postgres by the server; tests use an in-memory map.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Finds a session by ID, returning `None` when it does not exist.
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<AuthenticationError>>;

    /// Stores a new session.
    async fn create(&self, session: &Session) -> Result<(), Report<AuthenticationError>>;

    /// Deletes a session by ID (logout).
    async fn delete(&self, id: &SessionId) -> Result<(), Report<AuthenticationError>>;

    /// Deletes expired sessions, returning how many were removed.
    async fn delete_expired(&self) -> Result<u64, Report<AuthenticationError>>;
}
