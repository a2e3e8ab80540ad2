//! Postgres-backed session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reunion_platform_access::{AuthenticationError, Principal, Session, SessionId, SessionStore};
use rootcause::Report;
use sqlx::{FromRow, PgPool};

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    id: String,
    principal: String,
    display_name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl SessionRow {
    fn try_into_session(self) -> Result<Session, AuthenticationError> {
        let principal = Principal::new(self.principal)?;
        Ok(
            Session::restore(SessionId::new(self.id), principal, self.created_at, self.expires_at)
                .with_profile(self.display_name, self.email)
                .with_tokens(self.access_token, self.refresh_token),
        )
    }
}

fn store_error(e: sqlx::Error) -> AuthenticationError {
    AuthenticationError::StoreUnavailable {
        reason: e.to_string(),
    }
}

/// Session store over the `sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<AuthenticationError>> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, principal, display_name, email, created_at, expires_at,
                   access_token, refresh_token
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        match row {
            Some(r) => Ok(Some(r.try_into_session()?)),
            None => Ok(None),
        }
    }

    async fn create(&self, session: &Session) -> Result<(), Report<AuthenticationError>> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, principal, display_name, email, created_at, expires_at,
                                  access_token, refresh_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.principal().as_str())
        .bind(session.display_name())
        .bind(session.email())
        .bind(session.created_at())
        .bind(session.expires_at())
        .bind(session.access_token())
        .bind(session.refresh_token())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), Report<AuthenticationError>> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, Report<AuthenticationError>> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }
}

/// Generates a unique session ID using ULID.
pub fn generate_session_id() -> SessionId {
    SessionId::new(ulid::Ulid::new().to_string())
}
