//! Main Leptos application component and routing.

use crate::guard::{RoleGuard, use_guard_state};
use crate::types::{EventSummary, IdentityInfo};
use crate::user::get_identity;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};
use reunion_platform_access::Role;

/// Lists events with their ticket type counts for the admin dashboard.
#[server]
pub async fn list_admin_events() -> Result<Vec<EventSummary>, ServerFnError> {
    use crate::server_helpers::get_editor;

    let (state, principal) = get_editor().await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected admin event listing");
        e.into_server_error()
    })?;

    let events = state.catalog.list_events().await.map_err(|e| {
        tracing::error!(error = %e, principal = %principal.principal(), "Failed to list events");
        ServerFnError::new("Failed to load events")
    })?;

    let mut summaries = Vec::with_capacity(events.len());
    for event in events {
        let ticket_types = state
            .catalog
            .list_ticket_types(event.id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, event_id = %event.id, "Failed to list ticket types");
                ServerFnError::new("Failed to load events")
            })?
            .len();
        summaries.push(EventSummary {
            id: event.id.to_string(),
            name: event.name,
            location: event.location,
            starts_at: event.starts_at.format("%a %e %b %Y, %H:%M UTC").to_string(),
            is_active: event.is_active,
            ticket_types,
        });
    }

    Ok(summaries)
}

/// The main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Family Reunion"/>
        <Router>
            <Header/>
            <main class="container">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/sign-in") view=SignInPage/>
                    <Route path=path!("/unauthorized") view=UnauthorizedPage/>
                    <Route path=path!("/admin") view=AdminPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn Header() -> impl IntoView {
    let identity = Resource::new(|| (), |_| get_identity());

    view! {
        <header class="header">
            <a href="/" class="logo">"Family Reunion"</a>
            <nav class="header-right">
                <Suspense fallback=|| ()>
                    {move || {
                        identity.get().map(|result| match result {
                            Ok(Some(info)) => view! { <SignedInMenu info=info/> }.into_any(),
                            _ => view! {
                                <a href="/sign-in" class="login-button">"Sign in"</a>
                            }
                            .into_any(),
                        })
                    }}
                </Suspense>
            </nav>
        </header>
    }
}

#[component]
fn SignedInMenu(info: IdentityInfo) -> impl IntoView {
    view! {
        <div class="user-menu">
            <span class="user-name">{info.label().to_string()}</span>
            <a href="/admin">"Admin"</a>
            <a href="/auth/logout" rel="external">"Sign out"</a>
        </div>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <section class="home-page">
            <h1>"Family Reunion"</h1>
            <p>"Tickets, schedules, and news for this year's gathering."</p>
        </section>
    }
}

#[component]
fn SignInPage() -> impl IntoView {
    view! {
        <section class="sign-in-page">
            <h1>"Sign in"</h1>
            <p>"Sign in with your family account to continue."</p>
            <a href="/auth/login" rel="external" class="cta-button">"Continue to sign in"</a>
        </section>
    }
}

#[component]
fn UnauthorizedPage() -> impl IntoView {
    view! {
        <section class="unauthorized-page">
            <h1>"Not allowed"</h1>
            <p>"Your account does not have access to that page."</p>
            <a href="/">"Back to home"</a>
        </section>
    }
}

#[component]
fn AdminPage() -> impl IntoView {
    view! {
        <RoleGuard allowed_roles=vec![Role::Admin, Role::Organizer]>
            <AdminDashboard/>
        </RoleGuard>
    }
}

#[component]
fn AdminDashboard() -> impl IntoView {
    let events = Resource::new(|| (), |_| list_admin_events());
    let guard_state = use_guard_state();
    let badge = move || {
        guard_state.map(|state| {
            let state = state.get();
            if state.is_admin() {
                "Admin"
            } else if state.is_organizer() {
                "Organizer"
            } else {
                ""
            }
        })
    };

    view! {
        <section class="admin-page">
            <h1>"Event administration"</h1>
            <span class="role-badge">{badge}</span>
            <Suspense fallback=move || view! { <p>"Loading events..."</p> }>
                {move || {
                    events.get().map(|result| match result {
                        Ok(events) if events.is_empty() => {
                            view! { <p>"No events yet."</p> }.into_any()
                        }
                        Ok(events) => view! { <EventTable events=events/> }.into_any(),
                        Err(e) => view! { <p class="error">{e.to_string()}</p> }.into_any(),
                    })
                }}
            </Suspense>
        </section>
    }
}

#[component]
fn EventTable(events: Vec<EventSummary>) -> impl IntoView {
    view! {
        <table class="event-table">
            <thead>
                <tr>
                    <th>"Event"</th>
                    <th>"Starts"</th>
                    <th>"Location"</th>
                    <th>"Ticket types"</th>
                    <th>"Status"</th>
                </tr>
            </thead>
            <tbody>
                {events
                    .into_iter()
                    .map(|event| {
                        view! {
                            <tr>
                                <td>{event.name}</td>
                                <td>{event.starts_at}</td>
                                <td>{event.location.unwrap_or_default()}</td>
                                <td>{event.ticket_types}</td>
                                <td>{if event.is_active { "Active" } else { "Hidden" }}</td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}
