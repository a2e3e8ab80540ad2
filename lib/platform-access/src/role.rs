//! Role types for reunion access control.
//!
//! Two roles exist: `Admin` for platform oversight and `Organizer` for
//! running the event (managing events, ticket types, and attendee mail).
//! A principal may hold either, both, or neither.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role label granted to a principal.
///
/// Variant order is the canonical order used when listing roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Event organizer.
    Organizer,
}

impl Role {
    /// Every known role, in canonical order.
    pub const ALL: [Role; 2] = [Role::Admin, Role::Organizer];

    /// Returns the wire label for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Organizer => "organizer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole {
    pub label: String,
}

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.label)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole {
                label: s.to_string(),
            })
    }
}

/// Set of roles held by one principal.
///
/// Roles are kept deduplicated and in canonical order (admin before
/// organizer). On the wire a role set is a JSON array of labels; labels that
/// do not name a known role are dropped when deserializing, so an unexpected
/// value can never grant access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<Role>")]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set (no access).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a role set from roles in any order, removing duplicates.
    #[must_use]
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: Vec<Role> = roles.into_iter().collect();
        roles.sort();
        roles.dedup();
        Self { roles }
    }

    /// Creates a role set from wire labels, ignoring unknown labels.
    #[must_use]
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_roles(labels.into_iter().filter_map(|label| {
            let label = label.as_ref();
            match label.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping unrecognized role label");
                    None
                }
            }
        }))
    }

    /// Returns true if the set holds the given role.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if the set shares at least one role with `allowed`.
    #[must_use]
    pub fn intersects(&self, allowed: &[Role]) -> bool {
        allowed.iter().any(|role| self.contains(*role))
    }

    /// Returns true if the principal is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.contains(Role::Admin)
    }

    /// Returns true if the principal is an organizer.
    #[must_use]
    pub fn is_organizer(&self) -> bool {
        self.contains(Role::Organizer)
    }

    /// Returns true if no role is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the roles as a slice, in canonical order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self::from_roles(iter)
    }
}

impl From<Vec<String>> for RoleSet {
    fn from(labels: Vec<String>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Organizer.to_string(), "organizer");
        assert_eq!("organizer".parse::<Role>(), Ok(Role::Organizer));
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn none_has_no_roles() {
        let roles = RoleSet::none();
        assert!(roles.is_empty());
        assert!(!roles.is_admin());
        assert!(!roles.is_organizer());
    }

    #[test]
    fn from_roles_orders_and_dedups() {
        let roles = RoleSet::from_roles([Role::Organizer, Role::Admin, Role::Organizer]);
        assert_eq!(roles.roles(), &[Role::Admin, Role::Organizer]);
    }

    #[test]
    fn intersects_requires_a_shared_role() {
        let roles = RoleSet::from_roles([Role::Organizer]);
        assert!(roles.intersects(&[Role::Admin, Role::Organizer]));
        assert!(!roles.intersects(&[Role::Admin]));
        assert!(!roles.intersects(&[]));
    }

    #[test]
    fn serializes_as_label_array() {
        let roles = RoleSet::from_roles([Role::Organizer, Role::Admin]);
        let json = serde_json::to_string(&roles).expect("serialize");
        assert_eq!(json, r#"["admin","organizer"]"#);
    }

    #[test]
    fn deserialization_drops_unknown_labels() {
        let roles: RoleSet =
            serde_json::from_str(r#"["organizer","root","admin"]"#).expect("deserialize");
        assert_eq!(roles.roles(), &[Role::Admin, Role::Organizer]);
    }

    #[test]
    fn empty_array_is_empty_set() {
        let roles: RoleSet = serde_json::from_str("[]").expect("deserialize");
        assert!(roles.is_empty());
    }
}
