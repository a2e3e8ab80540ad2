//! Event endpoints.

use super::{parse_id, parse_json};
use crate::auth::{AppState, RequireEditor};
use crate::error::ApiError;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use reunion_catalog::{Event, EventPatch, NewEvent};
use reunion_core::EventId;
use std::sync::Arc;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.catalog.list_events().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let id: EventId = parse_id(&id)?;
    Ok(Json(state.catalog.get_event(id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    editor: RequireEditor,
    body: Bytes,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let new: NewEvent = parse_json(&body)?;
    let event = state.catalog.create_event(new).await?;
    tracing::info!(
        principal = %editor.principal.principal(),
        event_id = %event.id,
        "Event created via API"
    );
    Ok((StatusCode::CREATED, Json(event)))
}

/// Applies a partial update; absent fields keep their stored values.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    _editor: RequireEditor,
    body: Bytes,
) -> Result<Json<Event>, ApiError> {
    let id: EventId = parse_id(&id)?;
    let patch: EventPatch = parse_json(&body)?;
    Ok(Json(state.catalog.update_event(id, patch).await?))
}

/// Deletes the event and its ticket types.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    _editor: RequireEditor,
) -> Result<StatusCode, ApiError> {
    let id: EventId = parse_id(&id)?;
    state.catalog.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
