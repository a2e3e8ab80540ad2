//! Client-side tracking of identity and role resolution.
//!
//! [`RoleTracker`] is the state machine behind the UI's `use_user` hook. It
//! is fed identity snapshots from the identity provider and the outcomes of
//! role fetches, and exposes a [`GuardState`] for rendering.
//!
//! Each fetch is tagged with a generation number. Any identity change or
//! unmount bumps the generation, so a slow response from an earlier fetch
//! can never overwrite state produced by a later one.

use crate::principal::Principal;
use crate::role::RoleSet;
use std::fmt;
use std::time::Duration;

/// How long a role fetch may take before it is treated as failed.
pub const ROLE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What the identity provider currently reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentitySnapshot {
    /// The provider has finished determining whether anyone is signed in.
    pub is_loaded: bool,
    /// The signed-in principal, if any.
    pub principal: Option<Principal>,
}

impl IdentitySnapshot {
    /// The provider has not settled yet.
    #[must_use]
    pub fn loading() -> Self {
        Self::default()
    }

    /// The provider has settled, with or without a signed-in principal.
    #[must_use]
    pub fn resolved(principal: Option<Principal>) -> Self {
        Self {
            is_loaded: true,
            principal,
        }
    }
}

/// Lifecycle phase of role resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePhase {
    /// Identity provider has not settled.
    Unresolved,
    /// Settled with nobody signed in.
    Unauthenticated,
    /// Signed in, role fetch in flight.
    Pending,
    /// Role fetch succeeded.
    Fetched,
    /// Role fetch failed; roles stay empty.
    FetchFailed,
}

/// Why a role fetch did not produce roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The request could not be completed or decoded.
    Transport(String),
    /// No answer within [`ROLE_FETCH_TIMEOUT`].
    TimedOut,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "role endpoint returned status {status}"),
            Self::Transport(reason) => write!(f, "role request failed: {reason}"),
            Self::TimedOut => write!(f, "role request timed out"),
        }
    }
}

/// Handle for one issued role fetch. Completing with a stale ticket is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    principal: Principal,
}

impl FetchTicket {
    /// The principal whose roles are being fetched.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// View model consumed by the access gate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuardState {
    pub is_loaded: bool,
    pub is_signed_in: bool,
    pub roles: RoleSet,
    /// True once the role fetch for the current identity has settled.
    pub roles_resolved: bool,
}

impl GuardState {
    /// Signed in with a settled role fetch.
    #[must_use]
    pub fn resolved(roles: RoleSet) -> Self {
        Self {
            is_loaded: true,
            is_signed_in: true,
            roles,
            roles_resolved: true,
        }
    }

    /// Settled with nobody signed in.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            is_loaded: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    #[must_use]
    pub fn is_organizer(&self) -> bool {
        self.roles.is_organizer()
    }
}

/// State machine tracking identity and role resolution for one mounted UI.
#[derive(Debug, Clone)]
pub struct RoleTracker {
    identity: IdentitySnapshot,
    phase: RolePhase,
    roles: RoleSet,
    generation: u64,
    mounted: bool,
}

impl Default for RoleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            identity: IdentitySnapshot::loading(),
            phase: RolePhase::Unresolved,
            roles: RoleSet::none(),
            generation: 0,
            mounted: true,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RolePhase {
        self.phase
    }

    /// Feeds the latest identity snapshot.
    ///
    /// Returns a ticket when a role fetch must be issued. An unchanged
    /// snapshot returns `None` and leaves any in-flight fetch alone.
    pub fn identity_changed(&mut self, snapshot: IdentitySnapshot) -> Option<FetchTicket> {
        if !self.mounted {
            return None;
        }
        if snapshot == self.identity && self.phase != RolePhase::Unresolved {
            return None;
        }

        self.generation += 1;
        self.roles = RoleSet::none();
        self.identity = snapshot;

        match (self.identity.is_loaded, &self.identity.principal) {
            (false, _) => {
                self.phase = RolePhase::Unresolved;
                None
            }
            (true, None) => {
                self.phase = RolePhase::Unauthenticated;
                None
            }
            (true, Some(principal)) => {
                self.phase = RolePhase::Pending;
                Some(FetchTicket {
                    generation: self.generation,
                    principal: principal.clone(),
                })
            }
        }
    }

    /// Applies the outcome of a role fetch.
    ///
    /// Returns false when the outcome was discarded because the ticket is
    /// stale, the fetch already settled (for example by timing out), or the
    /// tracker was unmounted.
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: Result<RoleSet, FetchFailure>) -> bool {
        if !self.mounted || ticket.generation != self.generation || self.phase != RolePhase::Pending
        {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale role fetch result"
            );
            return false;
        }

        match outcome {
            Ok(roles) => {
                self.roles = roles;
                self.phase = RolePhase::Fetched;
            }
            Err(failure) => {
                tracing::warn!(
                    principal = %ticket.principal,
                    error = %failure,
                    "Role fetch failed; continuing without roles"
                );
                self.roles = RoleSet::none();
                self.phase = RolePhase::FetchFailed;
            }
        }
        true
    }

    /// Marks the owning component as torn down. Pending fetches are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }

    /// Returns the current view model.
    #[must_use]
    pub fn state(&self) -> GuardState {
        GuardState {
            is_loaded: self.identity.is_loaded,
            is_signed_in: self.identity.principal.is_some(),
            roles: self.roles.clone(),
            roles_resolved: matches!(self.phase, RolePhase::Fetched | RolePhase::FetchFailed),
        }
    }
}
