//! Platform access for the reunion ticketing site.
//!
//! This crate provides:
//! - Principals and sessions (`Principal`, `Session`, `SessionStore`)
//! - Roles and role resolution (`Role`, `RoleSet`, `RoleResolver`)
//! - The client-side role tracker behind the `use_user` hook (`RoleTracker`)
//! - The access gate used by protected pages (`AccessGate`)
//!
//! # Example
//!
//! ```
//! use reunion_platform_access::{
//!     AccessGate, GateView, GuardState, Principal, Role, StaticRoleResolver,
//! };
//!
//! let resolver = StaticRoleResolver::new(["user_1234"], ["user_5678"]);
//! let roles = resolver.resolve(&Principal::new("user_1234").unwrap());
//! assert!(roles.is_admin());
//!
//! let mut gate = AccessGate::new([Role::Admin]);
//! let state = GuardState::resolved(roles);
//! assert_eq!(gate.view(&state), GateView::Children);
//! assert_eq!(gate.observe(&state), None);
//! ```

pub mod auth;
pub mod error;
pub mod gate;
pub mod oidc;
pub mod principal;
pub mod resolver;
pub mod role;
pub mod session;
pub mod tracker;

pub use auth::{AuthResult, AuthenticatedPrincipal, OidcClaims, authenticate_session};
pub use error::{AuthenticationError, AuthorizationError};
pub use gate::{AccessGate, GateView};
pub use oidc::OidcConfig;
pub use principal::Principal;
pub use resolver::{RoleConfig, RoleResolver, StaticRoleResolver};
pub use role::{Role, RoleSet, UnknownRole};
pub use session::{Session, SessionId, SessionStore};
pub use tracker::{
    FetchFailure, FetchTicket, GuardState, IdentitySnapshot, ROLE_FETCH_TIMEOUT, RolePhase,
    RoleTracker,
};
