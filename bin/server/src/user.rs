//! Identity and role server functions backing the `use_user` hook.
//!
//! The hook reaches the role query through [`fetch_user_roles`] rather than
//! an HTTP call to `GET /api/user/roles`. Both run the same session and
//! resolver checks, and the server function's error messages carry the
//! status the endpoint would have answered with.

use crate::types::IdentityInfo;
use leptos::prelude::*;
use reunion_platform_access::{FetchFailure, RoleSet};

pub(crate) const NOT_AUTHENTICATED: &str = "Not authenticated";
pub(crate) const ACCESS_DENIED: &str = "Access denied";
pub(crate) const INTERNAL_ERROR: &str = "Internal server error";

/// Returns the signed-in principal, or `None` for anonymous visitors.
#[server]
pub async fn get_identity() -> Result<Option<IdentityInfo>, ServerFnError> {
    use crate::error::SessionError;
    use crate::server_helpers::get_authenticated_principal;

    match get_authenticated_principal().await {
        Ok((_, auth)) => Ok(Some(IdentityInfo {
            principal: auth.principal().to_string(),
            display_name: auth.session().display_name().map(str::to_string),
            email: auth.session().email().map(str::to_string),
        })),
        Err(SessionError::NotAuthenticated) => Ok(None),
        Err(e) => Err(e.into_server_error()),
    }
}

/// Returns the caller's roles, resolved fresh on every call.
///
/// Same contract as `GET /api/user/roles`: anonymous callers get an error
/// and the resolver is not consulted.
#[server]
pub async fn fetch_user_roles() -> Result<RoleSet, ServerFnError> {
    use crate::server_helpers::get_roles;

    get_roles()
        .await
        .map(|(_, roles)| roles)
        .map_err(|e| e.into_server_error())
}

/// Classifies a failed role fetch.
///
/// Errors raised by the server function body become the status the REST
/// endpoint uses for the same condition; anything else never got an answer.
pub fn role_fetch_failure(error: ServerFnError) -> FetchFailure {
    match error {
        ServerFnError::ServerError(message) => FetchFailure::Status(match message.as_str() {
            NOT_AUTHENTICATED => 401,
            ACCESS_DENIED => 403,
            _ => 500,
        }),
        other => FetchFailure::Transport(other.to_string()),
    }
}
