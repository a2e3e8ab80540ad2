//! Authentication primitives shared by the web layer.
//!
//! - `AuthenticatedPrincipal`: a principal backed by a live session
//! - `authenticate_session`: resolves a session cookie to an `AuthResult`
//! - `OidcClaims`: claims extracted from a verified ID token

use crate::error::AuthenticationError;
use crate::principal::Principal;
use crate::session::{Session, SessionId, SessionStore};
use rootcause::Report;

/// A principal whose session has been validated for this request.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    session: Session,
}

impl AuthenticatedPrincipal {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Returns the authenticated principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        self.session.principal()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// Result of an authentication attempt.
#[derive(Debug)]
pub enum AuthResult {
    /// Caller presented a valid session.
    Authenticated(Box<AuthenticatedPrincipal>),
    /// No session presented, or the session is unknown.
    Unauthenticated,
    /// Session found but expired. It has been removed from the store.
    SessionExpired { session_id: SessionId },
}

/// Resolves a session ID presented by the caller.
///
/// Missing, unknown, and expired sessions are ordinary outcomes; only a
/// store fault produces an error.
pub async fn authenticate_session(
    store: &dyn SessionStore,
    session_id: Option<SessionId>,
) -> Result<AuthResult, Report<AuthenticationError>> {
    let Some(session_id) = session_id else {
        return Ok(AuthResult::Unauthenticated);
    };

    let Some(session) = store.find(&session_id).await? else {
        tracing::debug!(session_id = %session_id, "Session not found");
        return Ok(AuthResult::Unauthenticated);
    };

    if session.is_expired() {
        if let Err(e) = store.delete(&session_id).await {
            tracing::warn!(error = %e, session_id = %session_id, "Failed to delete expired session");
        }
        return Ok(AuthResult::SessionExpired { session_id });
    }

    Ok(AuthResult::Authenticated(Box::new(
        AuthenticatedPrincipal::new(session),
    )))
}

/// Claims extracted from an OIDC ID token.
#[derive(Debug, Clone)]
pub struct OidcClaims {
    /// The subject claim, used as the principal.
    pub subject: String,
    /// The issuer URL.
    pub issuer: String,
    pub email: Option<String>,
    /// Display name (from name or preferred_username).
    pub display_name: Option<String>,
}

impl OidcClaims {
    #[must_use]
    pub fn new(subject: String, issuer: String) -> Self {
        Self {
            subject,
            issuer,
            email: None,
            display_name: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    /// Returns the subject as a principal.
    pub fn principal(&self) -> Result<Principal, AuthenticationError> {
        Principal::new(self.subject.clone()).map_err(|_| AuthenticationError::MissingClaim {
            claim: "sub".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        sessions: Mutex<HashMap<SessionId, Session>>,
    }

    impl MapStore {
        fn with(session: Session) -> Self {
            let store = Self::default();
            store
                .sessions
                .lock()
                .expect("lock")
                .insert(session.id().clone(), session);
            store
        }

        fn len(&self) -> usize {
            self.sessions.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl SessionStore for MapStore {
        async fn find(
            &self,
            id: &SessionId,
        ) -> Result<Option<Session>, Report<AuthenticationError>> {
            Ok(self.sessions.lock().expect("lock").get(id).cloned())
        }

        async fn create(&self, session: &Session) -> Result<(), Report<AuthenticationError>> {
            self.sessions
                .lock()
                .expect("lock")
                .insert(session.id().clone(), session.clone());
            Ok(())
        }

        async fn delete(&self, id: &SessionId) -> Result<(), Report<AuthenticationError>> {
            self.sessions.lock().expect("lock").remove(id);
            Ok(())
        }

        async fn delete_expired(&self) -> Result<u64, Report<AuthenticationError>> {
            Ok(0)
        }
    }

    fn session(id: &str, duration: Duration) -> Session {
        Session::new(
            SessionId::from(id),
            Principal::new("user_1234").expect("valid"),
            duration,
        )
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthenticated() {
        let store = MapStore::default();
        let result = authenticate_session(&store, None).await.expect("no fault");
        assert!(matches!(result, AuthResult::Unauthenticated));
    }

    #[tokio::test]
    async fn unknown_session_is_unauthenticated() {
        let store = MapStore::default();
        let result = authenticate_session(&store, Some(SessionId::from("nope")))
            .await
            .expect("no fault");
        assert!(matches!(result, AuthResult::Unauthenticated));
    }

    #[tokio::test]
    async fn valid_session_authenticates() {
        let store = MapStore::with(session("sess_ok", Duration::hours(1)));
        let result = authenticate_session(&store, Some(SessionId::from("sess_ok")))
            .await
            .expect("no fault");
        match result {
            AuthResult::Authenticated(auth) => {
                assert_eq!(auth.principal().as_str(), "user_1234");
            }
            other => panic!("expected authenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn expired_session_is_removed() {
        let store = MapStore::with(session("sess_old", Duration::seconds(-5)));
        let result = authenticate_session(&store, Some(SessionId::from("sess_old")))
            .await
            .expect("no fault");
        assert!(matches!(result, AuthResult::SessionExpired { .. }));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn oidc_claims_builder() {
        let claims = OidcClaims::new("sub_123".to_string(), "https://auth.example.com".to_string())
            .with_email(Some("user@example.com".to_string()))
            .with_display_name(Some("Test User".to_string()));

        assert_eq!(claims.principal().expect("subject").as_str(), "sub_123");
        assert_eq!(claims.email.as_deref(), Some("user@example.com"));
        assert_eq!(claims.display_name.as_deref(), Some("Test User"));
    }

    #[test]
    fn blank_subject_is_missing_claim() {
        let claims = OidcClaims::new(String::new(), "https://auth.example.com".to_string());
        assert_eq!(
            claims.principal(),
            Err(AuthenticationError::MissingClaim {
                claim: "sub".to_string()
            })
        );
    }
}
