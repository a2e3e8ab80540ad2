//! `GET /api/user/roles`.

use crate::auth::{AppState, RequirePrincipal, middleware::resolve_roles};
use crate::error::ApiError;
use axum::{Json, extract::State};
use reunion_platform_access::RoleSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: RoleSet,
}

/// Returns the roles of the caller. Unauthenticated callers get 401 and the
/// resolver is not consulted.
pub async fn user_roles(
    State(state): State<Arc<AppState>>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<RolesResponse>, ApiError> {
    let roles = resolve_roles(&state, &principal).await?;
    tracing::debug!(principal = %principal.principal(), roles = ?roles, "Resolved roles");
    Ok(Json(RolesResponse { roles }))
}
