//! Transactional email endpoints.
//!
//! Each handler checks the bearer secret, validates the body's required
//! fields, renders a template, and hands the result to the configured
//! [`EmailSender`](reunion_mailer::EmailSender). Validation failures never
//! reach the sender.

use crate::auth::AppState;
use crate::error::EmailApiError;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use reunion_mailer::{EmailMessage, MAX_BULK_RECIPIENTS, MailerError, templates};
use rootcause::Report;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use subtle::ConstantTimeEq;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderConfirmationRequest {
    customer_email: String,
    customer_name: String,
    order_id: String,
    event_name: String,
    tickets: Vec<templates::TicketLine>,
    total: f64,
}

#[derive(Debug, Deserialize)]
struct AdminNotificationRequest {
    subject: String,
    message: String,
    #[serde(default)]
    details: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct BulkRequest {
    recipients: Vec<String>,
    subject: String,
    message: String,
}

/// Checks `Authorization: Bearer <secret>` in constant time.
fn authorize(headers: &HeaderMap, secret: &str) -> Result<(), EmailApiError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(EmailApiError::Unauthorized)?;

    if secret.is_empty() || !bool::from(presented.as_bytes().ct_eq(secret.as_bytes())) {
        tracing::warn!("Rejected email API call with invalid bearer token");
        return Err(EmailApiError::Unauthorized);
    }
    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Parses the body and checks that every required field is present and non-empty.
fn parse_body<T: DeserializeOwned>(
    body: &[u8],
    required: &[&'static str],
) -> Result<T, EmailApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| EmailApiError::Malformed {
        reason: e.to_string(),
    })?;
    let Value::Object(fields) = &value else {
        return Err(EmailApiError::Malformed {
            reason: "expected a JSON object".to_string(),
        });
    };

    let missing: Vec<&'static str> = required
        .iter()
        .copied()
        .filter(|name| fields.get(*name).is_none_or(is_blank))
        .collect();
    if !missing.is_empty() {
        return Err(EmailApiError::MissingFields { fields: missing });
    }

    serde_json::from_value(value).map_err(|e| EmailApiError::Malformed {
        reason: e.to_string(),
    })
}

fn send_failed(report: Report<MailerError>, kind: &'static str) -> EmailApiError {
    tracing::error!(error = %report, email = kind, "Email delivery failed");
    EmailApiError::SendFailed
}

/// `POST /api/email/order-confirmation`
pub async fn order_confirmation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, EmailApiError> {
    authorize(&headers, &state.email.api_secret)?;
    let request: OrderConfirmationRequest = parse_body(
        &body,
        &[
            "customerEmail",
            "customerName",
            "orderId",
            "eventName",
            "tickets",
            "total",
        ],
    )?;

    let rendered = templates::order_confirmation(&templates::OrderConfirmation {
        customer_name: request.customer_name,
        order_id: request.order_id,
        event_name: request.event_name,
        tickets: request.tickets,
        total: request.total,
    });
    let message = EmailMessage::new(request.customer_email, rendered.subject, rendered.html)
        .with_text(rendered.text);

    let receipt = state
        .mailer
        .send(message)
        .await
        .map_err(|e| send_failed(e, "order-confirmation"))?;

    Ok(Json(json!({ "success": true, "id": receipt.id })))
}

/// `POST /api/email/admin-notification`
pub async fn admin_notification(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, EmailApiError> {
    authorize(&headers, &state.email.api_secret)?;
    let request: AdminNotificationRequest = parse_body(&body, &["subject", "message"])?;

    let rendered =
        templates::admin_notification(&request.subject, &request.message, request.details.as_ref());
    let message = EmailMessage::new(state.email.admin_address.clone(), rendered.subject, rendered.html)
        .with_text(rendered.text);

    let receipt = state
        .mailer
        .send(message)
        .await
        .map_err(|e| send_failed(e, "admin-notification"))?;

    Ok(Json(json!({ "success": true, "id": receipt.id })))
}

/// `POST /api/email/bulk`
///
/// One message per recipient, so addresses are never exposed to each other.
pub async fn bulk(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, EmailApiError> {
    authorize(&headers, &state.email.api_secret)?;
    let request: BulkRequest = parse_body(&body, &["recipients", "subject", "message"])?;

    if request.recipients.len() > MAX_BULK_RECIPIENTS {
        return Err(EmailApiError::TooManyRecipients {
            count: request.recipients.len(),
        });
    }

    let rendered = templates::bulk(&request.subject, &request.message);
    let messages: Vec<EmailMessage> = request
        .recipients
        .into_iter()
        .map(|recipient| {
            EmailMessage::new(recipient, rendered.subject.clone(), rendered.html.clone())
                .with_text(rendered.text.clone())
        })
        .collect();

    let requested = messages.len();
    let outcome = state.mailer.send_batch(messages).await;
    let ids: Vec<String> = outcome.receipts.into_iter().map(|r| r.id).collect();

    if let Some(report) = outcome.failure {
        if ids.is_empty() {
            return Err(send_failed(report, "bulk"));
        }
        tracing::error!(
            error = %report,
            sent = ids.len(),
            requested,
            "Bulk email stopped partway"
        );
        return Err(EmailApiError::PartialDelivery { requested, ids });
    }

    tracing::info!(sent = ids.len(), "Sent bulk email");
    Ok(Json(json!({ "success": true, "sent": ids.len(), "ids": ids })))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{ADMIN_ADDRESS, EMAIL_SECRET, TestApp, read_json};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};

    fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn recipients(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("guest{i}@example.org")).collect()
    }

    fn order_body() -> Value {
        json!({
            "customerEmail": "ada@example.org",
            "customerName": "Ada",
            "orderId": "ord_42",
            "eventName": "Reunion 2027",
            "tickets": [{ "name": "Adult", "quantity": 2, "price": 45.0 }],
            "total": 90.0,
        })
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = TestApp::new().await;

        let response = app
            .request(post("/api/email/order-confirmation", None, order_body()))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            read_json(response).await,
            json!({ "success": false, "error": "Unauthorized" })
        );
        assert!(app.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let app = TestApp::new().await;

        let response = app
            .request(post("/api/email/bulk", Some("guess"), json!({})))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn order_confirmation_goes_to_customer() {
        let app = TestApp::new().await;

        let response = app
            .request(post(
                "/api/email/order-confirmation",
                Some(EMAIL_SECRET),
                order_body(),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "success": true, "id": "email_1" })
        );
        let sent = app.mailer.sent();
        assert_eq!(sent[0].to, vec!["ada@example.org".to_string()]);
        assert_eq!(sent[0].subject, "Your tickets for Reunion 2027");
    }

    #[tokio::test]
    async fn missing_fields_are_listed() {
        let app = TestApp::new().await;
        let mut body = order_body();
        body["orderId"] = json!("");
        body.as_object_mut().unwrap().remove("total");

        let response = app
            .request(post("/api/email/order-confirmation", Some(EMAIL_SECRET), body))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({ "success": false, "error": "Missing required fields: orderId, total" })
        );
        assert!(app.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/email/admin-notification")
            .header(header::AUTHORIZATION, format!("Bearer {EMAIL_SECRET}"))
            .body(Body::from("not json"))
            .unwrap();

        let response = app.request(request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["success"], json!(false));
    }

    #[tokio::test]
    async fn admin_notification_goes_to_admin_address() {
        let app = TestApp::new().await;

        let response = app
            .request(post(
                "/api/email/admin-notification",
                Some(EMAIL_SECRET),
                json!({
                    "subject": "New order",
                    "message": "Ada bought two tickets",
                    "details": { "orderId": "ord_42" },
                }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let sent = app.mailer.sent();
        assert_eq!(sent[0].to, vec![ADMIN_ADDRESS.to_string()]);
        assert!(sent[0].html.contains("ord_42"));
    }

    #[tokio::test]
    async fn bulk_over_limit_is_rejected_before_sending() {
        let app = TestApp::new().await;

        let response = app
            .request(post(
                "/api/email/bulk",
                Some(EMAIL_SECRET),
                json!({
                    "recipients": recipients(501),
                    "subject": "Save the date",
                    "message": "See you in July",
                }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("500"));
        assert_eq!(app.mailer.batches(), 0);
    }

    #[tokio::test]
    async fn bulk_under_limit_relays_receipts() {
        let app = TestApp::new().await;

        let response = app
            .request(post(
                "/api/email/bulk",
                Some(EMAIL_SECRET),
                json!({
                    "recipients": recipients(499),
                    "subject": "Save the date",
                    "message": "See you in July",
                }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["sent"], json!(499));
        assert_eq!(body["ids"][498], json!("email_499"));
        assert_eq!(app.mailer.batches(), 1);
        assert_eq!(app.mailer.sent().len(), 499);
        assert_eq!(app.mailer.sent()[0].to, vec!["guest0@example.org".to_string()]);
    }

    #[tokio::test]
    async fn bulk_failure_partway_reports_delivered_ids() {
        let app = TestApp::new().await;
        app.mailer.fail_after(2);

        let response = app
            .request(post(
                "/api/email/bulk",
                Some(EMAIL_SECRET),
                json!({
                    "recipients": recipients(5),
                    "subject": "Save the date",
                    "message": "See you in July",
                }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["sent"], json!(2));
        assert_eq!(body["ids"], json!(["email_1", "email_2"]));
        assert!(!body["error"].as_str().unwrap().contains("secret provider detail"));
        assert_eq!(app.mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn bulk_failure_before_any_delivery_is_generic() {
        let app = TestApp::new().await;
        app.mailer.fail_next();

        let response = app
            .request(post(
                "/api/email/bulk",
                Some(EMAIL_SECRET),
                json!({
                    "recipients": recipients(3),
                    "subject": "Save the date",
                    "message": "See you in July",
                }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            json!({ "success": false, "error": "Failed to send email" })
        );
    }

    #[tokio::test]
    async fn sender_failure_is_generic_server_error() {
        let app = TestApp::new().await;
        app.mailer.fail_next();

        let response = app
            .request(post(
                "/api/email/order-confirmation",
                Some(EMAIL_SECRET),
                order_body(),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            json!({ "success": false, "error": "Failed to send email" })
        );
    }
}
