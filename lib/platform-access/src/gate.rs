//! Access gate for role-protected UI content.
//!
//! The gate is a UX guard, not a security boundary: every protected API
//! re-checks roles on the server. It decides what to render for a
//! [`GuardState`] and when to navigate away. Navigation is edge-triggered:
//! it fires when the evaluated outcome changes, never merely because the
//! component rendered again.

use crate::role::Role;
use crate::tracker::GuardState;

/// Default path for signed-in callers without an allowed role.
pub const DEFAULT_FALLBACK_PATH: &str = "/unauthorized";

/// Default path for callers who are not signed in.
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

/// What the gate renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Loading placeholder.
    Loading,
    /// Nothing.
    Hidden,
    /// The wrapped content.
    Children,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Waiting,
    SignInRequired,
    Denied,
    Granted,
}

/// Guard deciding render output and navigation for protected content.
#[derive(Debug, Clone)]
pub struct AccessGate {
    allowed_roles: Vec<Role>,
    fallback_path: String,
    sign_in_path: String,
    last_outcome: Option<Outcome>,
}

impl AccessGate {
    /// Creates a gate admitting any of `allowed_roles`.
    #[must_use]
    pub fn new(allowed_roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: allowed_roles.into_iter().collect(),
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            last_outcome: None,
        }
    }

    #[must_use]
    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }

    #[must_use]
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    #[must_use]
    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed_roles
    }

    fn evaluate(&self, state: &GuardState) -> Outcome {
        if !state.is_loaded {
            Outcome::Waiting
        } else if !state.is_signed_in {
            Outcome::SignInRequired
        } else if !state.roles_resolved {
            Outcome::Waiting
        } else if state.roles.intersects(&self.allowed_roles) {
            Outcome::Granted
        } else {
            Outcome::Denied
        }
    }

    /// Returns what to render for `state`. Has no side effects.
    ///
    /// Signed-out visitors see the placeholder until [`observe`](Self::observe)
    /// has issued the sign-in redirect, and nothing after that.
    #[must_use]
    pub fn view(&self, state: &GuardState) -> GateView {
        match self.evaluate(state) {
            Outcome::SignInRequired if self.last_outcome == Some(Outcome::SignInRequired) => {
                GateView::Hidden
            }
            Outcome::Waiting | Outcome::SignInRequired => GateView::Loading,
            Outcome::Denied => GateView::Hidden,
            Outcome::Granted => GateView::Children,
        }
    }

    /// Records `state` and returns a path to navigate to, if the outcome
    /// just changed into one that requires leaving the page.
    pub fn observe(&mut self, state: &GuardState) -> Option<String> {
        let outcome = self.evaluate(state);
        if self.last_outcome == Some(outcome) {
            return None;
        }
        self.last_outcome = Some(outcome);

        match outcome {
            Outcome::SignInRequired => Some(self.sign_in_path.clone()),
            Outcome::Denied => Some(self.fallback_path.clone()),
            Outcome::Waiting | Outcome::Granted => None,
        }
    }
}
