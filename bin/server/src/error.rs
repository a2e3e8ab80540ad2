//! Error types for the HTTP surfaces.
//!
//! Each surface has its own enum with a user-safe response shape. Internal
//! details are logged where the error is produced and never sent to clients.

use crate::user;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use leptos::server_fn::error::ServerFnError;
use reunion_catalog::CatalogError;
use reunion_mailer::MAX_BULK_RECIPIENTS;
use serde_json::json;
use std::fmt;

/// Errors from the JSON API under `/api` (roles and catalog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Unauthorized,
    Forbidden,
    NotFound { message: String },
    BadRequest { message: String },
    Internal,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::NotFound { message } | Self::BadRequest { message } => write!(f, "{message}"),
            Self::Internal => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => Self::NotFound {
                message: err.to_string(),
            },
            CatalogError::Invalid { .. } => Self::BadRequest {
                message: err.to_string(),
            },
            // Already logged by the catalog service.
            CatalogError::Store { .. } => Self::Internal,
        }
    }
}

/// Errors from the `/api/email/*` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailApiError {
    Unauthorized,
    MissingFields { fields: Vec<&'static str> },
    Malformed { reason: String },
    TooManyRecipients { count: usize },
    SendFailed,
    /// A bulk send stopped partway; `ids` are the messages that went out.
    PartialDelivery { requested: usize, ids: Vec<String> },
}

impl fmt::Display for EmailApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::MissingFields { fields } => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            Self::Malformed { reason } => write!(f, "Invalid request body: {reason}"),
            Self::TooManyRecipients { count } => write!(
                f,
                "Too many recipients: {count} (maximum {MAX_BULK_RECIPIENTS} per request)"
            ),
            Self::SendFailed => write!(f, "Failed to send email"),
            Self::PartialDelivery { requested, ids } => write!(
                f,
                "Failed to send email: {} of {requested} sent before delivery stopped",
                ids.len()
            ),
        }
    }
}

impl std::error::Error for EmailApiError {}

impl IntoResponse for EmailApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingFields { .. } | Self::Malformed { .. } | Self::TooManyRecipients { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::SendFailed | Self::PartialDelivery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let mut body = json!({ "success": false, "error": self.to_string() });
        if let Self::PartialDelivery { ids, .. } = self {
            body["sent"] = json!(ids.len());
            body["ids"] = json!(ids);
        }
        (status, Json(body)).into_response()
    }
}

/// Session errors surfaced through server functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NotAuthenticated,
    Forbidden,
    StoreUnavailable,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::Forbidden => write!(f, "missing required role"),
            Self::StoreUnavailable => write!(f, "session store unavailable"),
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionError {
    /// Convert to a user-safe ServerFnError.
    pub fn into_server_error(self) -> ServerFnError {
        match self {
            Self::NotAuthenticated => ServerFnError::new(user::NOT_AUTHENTICATED),
            Self::Forbidden => ServerFnError::new(user::ACCESS_DENIED),
            Self::StoreUnavailable => ServerFnError::new(user::INTERNAL_ERROR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_names() {
        let err = EmailApiError::MissingFields {
            fields: vec!["subject", "message"],
        };
        assert_eq!(err.to_string(), "Missing required fields: subject, message");
    }

    #[test]
    fn recipient_limit_message_mentions_limit() {
        let err = EmailApiError::TooManyRecipients { count: 501 };
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn partial_delivery_reports_progress() {
        let err = EmailApiError::PartialDelivery {
            requested: 5,
            ids: vec!["email_1".to_string(), "email_2".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Failed to send email: 2 of 5 sent before delivery stopped"
        );
    }

    #[test]
    fn catalog_errors_map_to_status() {
        let not_found: ApiError = CatalogError::NotFound {
            kind: "event",
            id: "evt_1".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let store: ApiError = CatalogError::Store {
            details: "down".to_string(),
        }
        .into();
        assert_eq!(store, ApiError::Internal);
        assert_eq!(store.to_string(), "Internal server error");
    }
}
