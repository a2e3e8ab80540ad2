//! Ticket type endpoints.

use super::{parse_id, parse_json};
use crate::auth::{AppState, RequireEditor};
use crate::error::ApiError;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use reunion_catalog::{NewTicketType, TicketType, TicketTypePatch};
use reunion_core::{EventId, TicketTypeId};
use std::sync::Arc;

/// Lists ticket types of one event, cheapest first.
pub async fn list_for_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<TicketType>>, ApiError> {
    let event_id: EventId = parse_id(&event_id)?;
    Ok(Json(state.catalog.list_ticket_types(event_id).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TicketType>, ApiError> {
    let id: TicketTypeId = parse_id(&id)?;
    Ok(Json(state.catalog.get_ticket_type(id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _editor: RequireEditor,
    body: Bytes,
) -> Result<(StatusCode, Json<TicketType>), ApiError> {
    let new: NewTicketType = parse_json(&body)?;
    let ticket_type = state.catalog.create_ticket_type(new).await?;
    Ok((StatusCode::CREATED, Json(ticket_type)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    _editor: RequireEditor,
    body: Bytes,
) -> Result<Json<TicketType>, ApiError> {
    let id: TicketTypeId = parse_id(&id)?;
    let patch: TicketTypePatch = parse_json(&body)?;
    Ok(Json(state.catalog.update_ticket_type(id, patch).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    _editor: RequireEditor,
) -> Result<StatusCode, ApiError> {
    let id: TicketTypeId = parse_id(&id)?;
    state.catalog.delete_ticket_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{TestApp, read_json};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};

    fn send(method: Method, uri: &str, session: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("session={session}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create_event(app: &TestApp, session: &str) -> String {
        let response = app
            .request(send(
                Method::POST,
                "/api/events",
                session,
                json!({ "name": "Reunion Dinner", "startsAt": "2027-07-04T18:00:00Z" }),
            ))
            .await;
        read_json(response).await["id"].as_str().unwrap().to_string()
    }

    async fn create_ticket(app: &TestApp, session: &str, event_id: &str, name: &str, price: i64) -> Value {
        let response = app
            .request(send(
                Method::POST,
                "/api/ticket-types",
                session,
                json!({ "eventId": event_id, "name": name, "priceCents": price }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        read_json(response).await
    }

    #[tokio::test]
    async fn ticket_types_are_listed_per_event() {
        let app = TestApp::new().await;
        let admin = app.sign_in("user_1234").await;
        let event_id = create_event(&app, &admin).await;
        create_ticket(&app, &admin, &event_id, "Adult", 4500).await;
        create_ticket(&app, &admin, &event_id, "Child", 1500).await;

        let response = app
            .request(get(&format!("/api/events/{event_id}/ticket-types")))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let names: Vec<Value> = read_json(response)
            .await
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("Child"), json!("Adult")]);
    }

    #[tokio::test]
    async fn ticket_type_for_missing_event_is_not_found() {
        let app = TestApp::new().await;
        let admin = app.sign_in("user_1234").await;

        let response = app
            .request(send(
                Method::POST,
                "/api/ticket-types",
                &admin,
                json!({
                    "eventId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
                    "name": "Adult",
                    "priceCents": 4500,
                }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn negative_price_is_bad_request() {
        let app = TestApp::new().await;
        let admin = app.sign_in("user_1234").await;
        let event_id = create_event(&app, &admin).await;

        let response = app
            .request(send(
                Method::POST,
                "/api/ticket-types",
                &admin,
                json!({ "eventId": event_id, "name": "Adult", "priceCents": -1 }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_and_delete_ticket_type() {
        let app = TestApp::new().await;
        let organizer = app.sign_in("user_5678").await;
        let event_id = create_event(&app, &organizer).await;
        let ticket = create_ticket(&app, &organizer, &event_id, "Adult", 4500).await;
        let id = ticket["id"].as_str().unwrap();

        let response = app
            .request(send(
                Method::PATCH,
                &format!("/api/ticket-types/{id}"),
                &organizer,
                json!({ "quantity": 120 }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = read_json(response).await;
        assert_eq!(updated["quantity"], json!(120));
        assert_eq!(updated["priceCents"], json!(4500));

        let response = app
            .request(send(
                Method::DELETE,
                &format!("/api/ticket-types/{id}"),
                &organizer,
                json!({}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.request(get(&format!("/api/ticket-types/{id}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn guests_cannot_delete_ticket_types() {
        let app = TestApp::new().await;
        let admin = app.sign_in("user_1234").await;
        let guest = app.sign_in("user_9999").await;
        let event_id = create_event(&app, &admin).await;
        let ticket = create_ticket(&app, &admin, &event_id, "Adult", 4500).await;
        let id = ticket["id"].as_str().unwrap();

        let response = app
            .request(send(
                Method::DELETE,
                &format!("/api/ticket-types/{id}"),
                &guest,
                json!({}),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
