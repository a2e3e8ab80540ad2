//! JSON API served under `/api`.
//!
//! - `GET /api/user/roles`: roles of the signed-in principal
//! - `POST /api/email/*`: transactional email, guarded by a bearer secret
//! - `/api/events`, `/api/ticket-types`: catalog CRUD; reads are public,
//!   writes need the admin or organizer role

pub mod email;
pub mod events;
pub mod roles;
pub mod ticket_types;

#[cfg(test)]
pub(crate) mod testing;

use crate::auth::AppState;
use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use std::sync::Arc;

/// Builds the API router.
pub fn router<S>() -> Router<S>
where
    Arc<AppState>: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/user/roles", get(roles::user_roles))
        .route(
            "/api/email/order-confirmation",
            post(email::order_confirmation),
        )
        .route(
            "/api/email/admin-notification",
            post(email::admin_notification),
        )
        .route("/api/email/bulk", post(email::bulk))
        .route("/api/events", get(events::list).post(events::create))
        .route(
            "/api/events/{id}",
            get(events::get).patch(events::update).delete(events::delete),
        )
        .route("/api/events/{id}/ticket-types", get(ticket_types::list_for_event))
        .route("/api/ticket-types", post(ticket_types::create))
        .route(
            "/api/ticket-types/{id}",
            get(ticket_types::get)
                .patch(ticket_types::update)
                .delete(ticket_types::delete),
        )
}

/// Parses a JSON request body, mapping failures to a 400 with the API's error shape.
fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, crate::error::ApiError> {
    serde_json::from_slice(body).map_err(|e| crate::error::ApiError::BadRequest {
        message: format!("Invalid request body: {e}"),
    })
}

/// Parses a path ID such as `evt_01H...` or a bare ULID.
fn parse_id<T>(raw: &str) -> Result<T, crate::error::ApiError>
where
    T: std::str::FromStr<Err = reunion_core::ParseIdError>,
{
    raw.parse().map_err(|e: reunion_core::ParseIdError| crate::error::ApiError::BadRequest {
        message: e.to_string(),
    })
}
