//! Authentication extractors for Axum.
//!
//! A caller identifies itself with the `session` cookie set at login, or
//! with `Authorization: Bearer <session id>` for non-browser clients.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use reunion_platform_access::{
    AuthResult, AuthenticatedPrincipal, Role, RoleSet, SessionId, authenticate_session,
};
use std::sync::Arc;

use super::AppState;
use crate::error::ApiError;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Roles allowed to modify the catalog.
pub const CATALOG_EDITORS: [Role; 2] = [Role::Admin, Role::Organizer];

/// Returns the session ID presented with a request, cookie first.
pub fn presented_session_id(headers: &HeaderMap, jar: &CookieJar) -> Option<SessionId> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(SessionId::new(cookie.value().to_string()));
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| SessionId::new(token.to_string()))
}

/// Resolves a presented session to an authenticated principal.
pub async fn authenticate(
    state: &AppState,
    session_id: Option<SessionId>,
) -> Result<AuthenticatedPrincipal, AuthRejection> {
    match authenticate_session(state.sessions.as_ref(), session_id).await {
        Ok(AuthResult::Authenticated(principal)) => Ok(*principal),
        Ok(AuthResult::Unauthenticated) => Err(AuthRejection::NotAuthenticated),
        Ok(AuthResult::SessionExpired { session_id }) => {
            tracing::debug!(session_id = %session_id, "Rejected expired session");
            Err(AuthRejection::SessionExpired)
        }
        Err(e) => {
            tracing::error!(error = %e, "Session lookup failed");
            Err(AuthRejection::InternalError)
        }
    }
}

/// Resolves the roles of an authenticated principal.
pub async fn resolve_roles(
    state: &AppState,
    principal: &AuthenticatedPrincipal,
) -> Result<RoleSet, AuthRejection> {
    state
        .roles
        .resolve_roles(principal.principal())
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                principal = %principal.principal(),
                "Role resolution failed"
            );
            AuthRejection::InternalError
        })
}

/// Extractor for requiring an authenticated principal.
pub struct RequirePrincipal(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for RequirePrincipal
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = presented_session_id(&parts.headers, &jar);

        authenticate(&app_state, session_id)
            .await
            .map(RequirePrincipal)
    }
}

/// Extractor for requiring a principal allowed to edit the catalog.
pub struct RequireEditor {
    pub principal: AuthenticatedPrincipal,
    pub roles: RoleSet,
}

impl<S> FromRequestParts<S> for RequireEditor
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequirePrincipal(principal) = RequirePrincipal::from_request_parts(parts, state).await?;
        let app_state = Arc::<AppState>::from_ref(state);
        let roles = resolve_roles(&app_state, &principal).await?;

        if !roles.intersects(&CATALOG_EDITORS) {
            tracing::warn!(
                principal = %principal.principal(),
                "Principal without editor role attempted catalog change"
            );
            return Err(AuthRejection::MissingRole);
        }

        Ok(RequireEditor { principal, roles })
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    NotAuthenticated,
    SessionExpired,
    MissingRole,
    InternalError,
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::NotAuthenticated | AuthRejection::SessionExpired => Self::Unauthorized,
            AuthRejection::MissingRole => Self::Forbidden,
            AuthRejection::InternalError => Self::Internal,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
