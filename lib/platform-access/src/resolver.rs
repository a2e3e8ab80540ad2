//! Role resolution: mapping a principal to the roles it holds.
//!
//! The resolver is injected wherever roles are needed, so the allow-list
//! backed implementation here can be swapped for a persistent store
//! without touching callers.

use crate::error::AuthorizationError;
use crate::principal::Principal;
use crate::role::{Role, RoleSet};
use async_trait::async_trait;
use rootcause::Report;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Looks up the roles assigned to an authenticated principal.
///
/// Principals with no assignment resolve to an empty set, never an error.
/// Errors are reserved for backing store faults.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    /// Returns the roles held by `principal`.
    async fn resolve_roles(
        &self,
        principal: &Principal,
    ) -> Result<RoleSet, Report<AuthorizationError>>;
}

/// Allow-list configuration for [`StaticRoleResolver`].
///
/// Each list is a comma-separated string so it can be supplied through a
/// single environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Principals granted the admin role.
    #[serde(default)]
    admin_principals: String,
    /// Principals granted the organizer role.
    #[serde(default)]
    organizer_principals: String,
}

impl RoleConfig {
    /// Creates a configuration from comma-separated allow-lists.
    #[must_use]
    pub fn new(admin_principals: impl Into<String>, organizer_principals: impl Into<String>) -> Self {
        Self {
            admin_principals: admin_principals.into(),
            organizer_principals: organizer_principals.into(),
        }
    }

    /// Returns the admin allow-list entries.
    #[must_use]
    pub fn admin_principals(&self) -> Vec<&str> {
        split_list(&self.admin_principals)
    }

    /// Returns the organizer allow-list entries.
    #[must_use]
    pub fn organizer_principals(&self) -> Vec<&str> {
        split_list(&self.organizer_principals)
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Resolves roles by membership in two fixed allow-lists.
///
/// The lists may overlap; a principal on both holds both roles.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleResolver {
    admins: HashSet<String>,
    organizers: HashSet<String>,
}

impl StaticRoleResolver {
    /// Creates a resolver from explicit allow-lists.
    #[must_use]
    pub fn new<A, O, S>(admins: A, organizers: O) -> Self
    where
        A: IntoIterator<Item = S>,
        O: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
            organizers: organizers.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a resolver from configuration.
    #[must_use]
    pub fn from_config(config: &RoleConfig) -> Self {
        Self::new(config.admin_principals(), config.organizer_principals())
    }

    /// Resolves roles synchronously. Never fails.
    #[must_use]
    pub fn resolve(&self, principal: &Principal) -> RoleSet {
        let id = principal.as_str();
        let mut roles = Vec::with_capacity(2);
        if self.admins.contains(id) {
            roles.push(Role::Admin);
        }
        if self.organizers.contains(id) {
            roles.push(Role::Organizer);
        }
        RoleSet::from_roles(roles)
    }
}

#[async_trait]
impl RoleResolver for StaticRoleResolver {
    async fn resolve_roles(
        &self,
        principal: &Principal,
    ) -> Result<RoleSet, Report<AuthorizationError>> {
        Ok(self.resolve(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: &str) -> Principal {
        Principal::new(id).expect("valid principal")
    }

    fn resolver() -> StaticRoleResolver {
        StaticRoleResolver::new(["user_1234", "user_both"], ["user_5678", "user_both"])
    }

    #[test]
    fn unlisted_principal_has_empty_set() {
        let roles = resolver().resolve(&principal("user_9999"));
        assert!(roles.is_empty());
    }

    #[test]
    fn admin_listed_principal() {
        let roles = resolver().resolve(&principal("user_1234"));
        assert_eq!(roles.roles(), &[Role::Admin]);
    }

    #[test]
    fn organizer_listed_principal() {
        let roles = resolver().resolve(&principal("user_5678"));
        assert_eq!(roles.roles(), &[Role::Organizer]);
    }

    #[test]
    fn principal_on_both_lists_holds_each_role_once() {
        let roles = resolver().resolve(&principal("user_both"));
        assert_eq!(roles.roles(), &[Role::Admin, Role::Organizer]);
    }

    #[test]
    fn lookup_is_exact_match() {
        let roles = resolver().resolve(&principal("USER_1234"));
        assert!(roles.is_empty());
    }

    #[test]
    fn config_parses_comma_separated_lists() {
        let config = RoleConfig::new(" user_a, user_b ,,", "user_c");
        assert_eq!(config.admin_principals(), vec!["user_a", "user_b"]);
        assert_eq!(config.organizer_principals(), vec!["user_c"]);

        let resolver = StaticRoleResolver::from_config(&config);
        assert!(resolver.resolve(&principal("user_b")).is_admin());
        assert!(resolver.resolve(&principal("user_c")).is_organizer());
    }

    #[test]
    fn config_defaults_to_empty_lists() {
        let config: RoleConfig = serde_json::from_str("{}").expect("deserialize");
        assert!(config.admin_principals().is_empty());
        assert!(config.organizer_principals().is_empty());
    }

    #[tokio::test]
    async fn trait_object_resolves() {
        let resolver: Box<dyn RoleResolver> = Box::new(resolver());
        let roles = resolver
            .resolve_roles(&principal("user_1234"))
            .await
            .expect("static resolution never fails");
        assert!(roles.is_admin());
    }
}
