//! Helpers for server functions: request state, authentication, roles.
//!
//! Server functions share the extractor logic of the JSON API so a session
//! means the same thing on both surfaces.

use crate::auth::AppState;
use crate::auth::middleware::{
    AuthRejection, CATALOG_EDITORS, authenticate, presented_session_id, resolve_roles,
};
use crate::error::SessionError;
use axum::Extension;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use reunion_platform_access::{AuthenticatedPrincipal, RoleSet};
use std::sync::Arc;

impl From<AuthRejection> for SessionError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::NotAuthenticated | AuthRejection::SessionExpired => {
                Self::NotAuthenticated
            }
            AuthRejection::MissingRole => Self::Forbidden,
            AuthRejection::InternalError => Self::StoreUnavailable,
        }
    }
}

/// Gets the application state attached to the request.
pub async fn get_app_state() -> Result<Arc<AppState>, SessionError> {
    leptos_axum::extract::<Extension<Arc<AppState>>>()
        .await
        .map(|Extension(state)| state)
        .map_err(|e| {
            tracing::error!(error = %e, "Application state missing from request");
            SessionError::StoreUnavailable
        })
}

/// Extracts and validates the caller's session.
pub async fn get_authenticated_principal()
-> Result<(Arc<AppState>, AuthenticatedPrincipal), SessionError> {
    let state = get_app_state().await?;
    let headers = leptos_axum::extract::<HeaderMap>().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to extract request headers");
        SessionError::NotAuthenticated
    })?;
    let jar = CookieJar::from_headers(&headers);

    let principal = authenticate(&state, presented_session_id(&headers, &jar)).await?;
    Ok((state, principal))
}

/// Resolves the caller's roles.
pub async fn get_roles() -> Result<(AuthenticatedPrincipal, RoleSet), SessionError> {
    let (state, principal) = get_authenticated_principal().await?;
    let roles = resolve_roles(&state, &principal).await?;
    Ok((principal, roles))
}

/// Requires the caller to hold an editor role.
pub async fn get_editor() -> Result<(Arc<AppState>, AuthenticatedPrincipal), SessionError> {
    let (state, principal) = get_authenticated_principal().await?;
    let roles = resolve_roles(&state, &principal).await?;

    if !roles.intersects(&CATALOG_EDITORS) {
        tracing::warn!(
            principal = %principal.principal(),
            "Principal without editor role called an admin server function"
        );
        return Err(SessionError::Forbidden);
    }

    Ok((state, principal))
}
