//! Authentication routes for login, callback, and logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration as ChronoDuration;
use reunion_platform_access::{Session, SessionId};
use serde::Deserialize;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::{
    AppState, SESSION_COOKIE,
    db::generate_session_id,
    oidc::{AuthState, OidcClient},
};

/// Auth state cookie name (CSRF, PKCE, and nonce during the OIDC flow).
const AUTH_STATE_COOKIE: &str = "auth_state";

/// Query parameters for the OIDC callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: String,
}

/// Redirects the browser to the identity provider.
pub async fn login(
    State(app): State<Arc<AppState>>,
    State(oidc): State<Arc<OidcClient>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthError> {
    let (auth_url, auth_state) = oidc.authorization_url();

    let auth_state_json =
        serde_json::to_string(&auth_state).map_err(|e| AuthError::Internal(e.to_string()))?;

    let cookie = Cookie::build((AUTH_STATE_COOKIE, auth_state_json))
        .path("/")
        .http_only(true)
        .secure(app.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    Ok((jar.add(cookie), Redirect::to(&auth_url)))
}

/// Completes login: verifies state, exchanges the code, opens a session.
pub async fn callback(
    State(app): State<Arc<AppState>>,
    State(oidc): State<Arc<OidcClient>>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthError> {
    let auth_state: AuthState = jar
        .get(AUTH_STATE_COOKIE)
        .ok_or(AuthError::MissingAuthState)
        .and_then(|cookie| {
            serde_json::from_str(cookie.value()).map_err(|_| AuthError::InvalidAuthState)
        })?;

    if query.state != auth_state.csrf_token {
        return Err(AuthError::CsrfMismatch);
    }

    let token_result = oidc
        .exchange_code(&query.code, &auth_state)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let claims = token_result.claims;
    let principal = claims
        .principal()
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let duration_minutes = app.session_config.duration_minutes;
    let session = Session::new(
        generate_session_id(),
        principal,
        ChronoDuration::minutes(duration_minutes),
    )
    .with_profile(claims.display_name, claims.email)
    .with_tokens(
        Some(token_result.access_token),
        token_result.refresh_token,
    );

    app.sessions
        .create(&session)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

    tracing::info!(
        principal = %session.principal(),
        issuer = %claims.issuer,
        "Signed in"
    );

    let session_cookie = Cookie::build((SESSION_COOKIE, session.id().as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(app.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(duration_minutes));

    let remove_auth_state = Cookie::build((AUTH_STATE_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    Ok((jar.add(session_cookie).add(remove_auth_state), Redirect::to("/")))
}

/// Deletes the caller's session and clears the cookie.
pub async fn logout(State(app): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session_id = SessionId::new(cookie.value().to_string());
        if let Err(e) = app.sessions.delete(&session_id).await {
            tracing::warn!(error = %e, session_id = %session_id, "Failed to delete session on logout");
        }
    }

    let remove_session = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    (jar.add(remove_session), Redirect::to("/"))
}

/// Login flow errors.
#[derive(Debug)]
pub enum AuthError {
    MissingAuthState,
    InvalidAuthState,
    CsrfMismatch,
    TokenExchange(String),
    Store(String),
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthState => (StatusCode::BAD_REQUEST, "Missing auth state"),
            Self::InvalidAuthState => (StatusCode::BAD_REQUEST, "Invalid auth state"),
            Self::CsrfMismatch => (StatusCode::BAD_REQUEST, "CSRF token mismatch"),
            Self::TokenExchange(msg) => {
                tracing::error!(error = %msg, "Token exchange failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
            Self::Store(msg) => {
                tracing::error!(error = %msg, "Failed to store session");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Login failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
