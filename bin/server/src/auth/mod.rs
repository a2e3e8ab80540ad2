//! Authentication and request-scoped identity for the reunion server.
//!
//! This module provides:
//! - OIDC login against the external identity provider
//! - Database-backed sessions keyed by the `session` cookie
//! - Extractors that resolve a request to a principal and its roles
//!
//! Roles are never stored in the session. Every check asks the injected
//! [`RoleResolver`], so an allow-list change applies to the next request.

pub mod db;
pub mod middleware;
pub mod oidc;
pub mod routes;

use crate::config::SessionConfig;
use reunion_catalog::Catalog;
use reunion_mailer::EmailSender;
use reunion_platform_access::{RoleResolver, SessionStore};
use std::sync::Arc;

pub use middleware::{AuthRejection, RequireEditor, RequirePrincipal, SESSION_COOKIE};
pub use oidc::OidcClient;
pub use routes::{callback, login, logout};

/// Settings for the transactional email endpoints.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    /// Bearer secret callers must present.
    pub api_secret: String,
    /// Recipient of admin notifications.
    pub admin_address: String,
}

/// Shared application state.
///
/// Every collaborator is a trait object so tests can substitute in-memory
/// doubles for Postgres, the role allow-list, and the email provider.
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub roles: Arc<dyn RoleResolver>,
    pub catalog: Catalog,
    pub mailer: Arc<dyn EmailSender>,
    pub email: EmailSettings,
    pub session_config: SessionConfig,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        roles: Arc<dyn RoleResolver>,
        catalog: Catalog,
        mailer: Arc<dyn EmailSender>,
        email: EmailSettings,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            sessions,
            roles,
            catalog,
            mailer,
            email,
            session_config,
        }
    }
}
