//! Mailer configuration.

use serde::Deserialize;

fn default_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

/// Settings for the Resend HTTP API.
#[derive(Debug, Clone, Deserialize)]
pub struct MailerConfig {
    pub api_key: String,
    /// Sender address, e.g. `Reunion <tickets@example.org>`.
    pub from_address: String,
    /// Recipient of admin notifications.
    pub admin_address: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl MailerConfig {
    pub fn new(
        api_key: impl Into<String>,
        from_address: impl Into<String>,
        admin_address: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            from_address: from_address.into(),
            admin_address: admin_address.into(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
