//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `AuthenticationError`: failures establishing who the caller is
//! - `AuthorizationError`: failures deciding what the caller may do

use std::fmt;

/// Errors from authentication operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// A principal identifier was empty or blank.
    InvalidPrincipal { reason: String },
    /// Session not found or invalid.
    InvalidSession { session_id: String },
    /// Session has expired.
    SessionExpired { session_id: String },
    /// OIDC provider error.
    ProviderError { provider: String, reason: String },
    /// Missing required claim in token.
    MissingClaim { claim: String },
    /// The session store could not be reached or returned bad data.
    StoreUnavailable { reason: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrincipal { reason } => write!(f, "invalid principal: {reason}"),
            Self::InvalidSession { session_id } => write!(f, "invalid session: {session_id}"),
            Self::SessionExpired { session_id } => {
                write!(f, "session has expired: {session_id}")
            }
            Self::ProviderError { provider, reason } => {
                write!(f, "OIDC provider '{provider}' error: {reason}")
            }
            Self::MissingClaim { claim } => write!(f, "missing required claim: {claim}"),
            Self::StoreUnavailable { reason } => write!(f, "session store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// Errors from authorization operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// Caller is not authenticated.
    NotAuthenticated,
    /// Caller holds none of the roles required for the operation.
    MissingRole { principal: String, required: String },
    /// Role lookup failed due to a backing store fault.
    ResolutionFailed { reason: String },
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "caller is not authenticated"),
            Self::MissingRole {
                principal,
                required,
            } => write!(f, "principal {principal} lacks any of the roles: {required}"),
            Self::ResolutionFailed { reason } => write!(f, "role resolution failed: {reason}"),
        }
    }
}

impl std::error::Error for AuthorizationError {}
