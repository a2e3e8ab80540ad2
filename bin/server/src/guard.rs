//! Client-side identity hook and role gate.
//!
//! [`use_user`] drives a [`RoleTracker`] from the identity server function
//! and the role server function. [`RoleGuard`] renders its children only
//! for principals holding one of the allowed roles and redirects everyone
//! else. The gate is a UX convenience; the API checks roles on its own.

use crate::types::IdentityInfo;
use crate::user::{fetch_user_roles, get_identity, role_fetch_failure};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use reunion_platform_access::{
    AccessGate, FetchFailure, FetchTicket, GateView, GuardState,
    IdentitySnapshot, Principal, ROLE_FETCH_TIMEOUT, Role, RoleSet, RoleTracker,
};

fn identity_snapshot(
    identity: Option<Result<Option<IdentityInfo>, ServerFnError>>,
) -> IdentitySnapshot {
    match identity {
        None => IdentitySnapshot::loading(),
        Some(Ok(Some(info))) => match Principal::new(info.principal) {
            Ok(principal) => IdentitySnapshot::resolved(Some(principal)),
            Err(e) => {
                tracing::warn!(error = %e, "Identity provider returned an unusable principal");
                IdentitySnapshot::resolved(None)
            }
        },
        Some(Ok(None)) => IdentitySnapshot::resolved(None),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Identity lookup failed; treating visitor as signed out");
            IdentitySnapshot::resolved(None)
        }
    }
}

/// Identity and role state for the calling component.
///
/// Roles are fetched whenever the identity changes. A fetch that takes
/// longer than [`ROLE_FETCH_TIMEOUT`] settles as failed, and results that
/// arrive after a newer fetch started or after the component unmounted are
/// dropped.
pub fn use_user() -> ReadSignal<GuardState> {
    let identity = Resource::new(|| (), |_| get_identity());
    let tracker = StoredValue::new(RoleTracker::new());
    let state = RwSignal::new(GuardState::default());

    let settle = move |ticket: FetchTicket, outcome: Result<RoleSet, FetchFailure>| {
        let applied = tracker
            .try_update_value(|t| t.complete(&ticket, outcome))
            .unwrap_or(false);
        if applied {
            state.try_set(tracker.with_value(RoleTracker::state));
        }
    };

    Effect::new(move |_| {
        let snapshot = identity_snapshot(identity.get());
        let Some(ticket) = tracker
            .try_update_value(|t| t.identity_changed(snapshot))
            .flatten()
        else {
            state.set(tracker.with_value(RoleTracker::state));
            return;
        };
        state.set(tracker.with_value(RoleTracker::state));

        let timed_out = ticket.clone();
        set_timeout(
            move || settle(timed_out, Err(FetchFailure::TimedOut)),
            ROLE_FETCH_TIMEOUT,
        );

        spawn_local(async move {
            let outcome = fetch_user_roles().await.map_err(role_fetch_failure);
            settle(ticket, outcome);
        });
    });

    on_cleanup(move || {
        tracker.try_update_value(RoleTracker::unmount);
    });

    state.read_only()
}

/// Renders `children` only for principals holding one of `allowed_roles`.
///
/// While identity or roles are loading a placeholder is shown. Signed-out
/// visitors are sent to the sign-in page and signed-in visitors without an
/// allowed role to `fallback_path`, each once per transition.
#[component]
pub fn RoleGuard(
    allowed_roles: Vec<Role>,
    #[prop(optional, into)] fallback_path: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let user = use_user();
    provide_context(user);

    let mut gate = AccessGate::new(allowed_roles);
    if let Some(path) = fallback_path {
        gate = gate.with_fallback_path(path);
    }
    let gate = RwSignal::new(gate);
    let navigate = use_navigate();

    Effect::new(move |_| {
        let current = user.get();
        if let Some(path) = gate.try_update(|g| g.observe(&current)).flatten() {
            navigate(&path, Default::default());
        }
    });

    move || match gate.with(|g| g.view(&user.get())) {
        GateView::Loading => view! { <p class="loading">"Loading..."</p> }.into_any(),
        GateView::Hidden => ().into_any(),
        GateView::Children => children().into_any(),
    }
}

/// The guard state provided by the nearest [`RoleGuard`].
pub fn use_guard_state() -> Option<ReadSignal<GuardState>> {
    use_context::<ReadSignal<GuardState>>()
}
