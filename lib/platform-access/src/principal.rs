//! The authenticated identity of a caller.

use crate::error::AuthenticationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier issued by the external identity provider.
///
/// This is the OIDC `sub` claim. The platform never creates principals; it
/// only carries them from the provider through sessions to role lookups.
/// The only validation applied is that the identifier is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Creates a principal, rejecting blank identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self, AuthenticationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AuthenticationError::InvalidPrincipal {
                reason: "principal identifier is empty".to_string(),
            });
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Principal {
    type Error = AuthenticationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}
