//! Shared types used across server functions and UI components.

use serde::{Deserialize, Serialize};

/// The signed-in principal as shown in the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
    pub principal: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl IdentityInfo {
    /// Name to greet the user with.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.principal)
    }
}

/// Event row for the admin dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    /// Start time, formatted for display.
    pub starts_at: String,
    pub is_active: bool,
    pub ticket_types: usize,
}
