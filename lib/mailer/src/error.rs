//! Error types for email delivery.

use std::fmt;

/// Errors from sending email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailerError {
    /// The provider did not answer in time.
    Timeout,
    /// The request never reached the provider.
    Transport { reason: String },
    /// The provider refused the request.
    Rejected { status: u16, body: String },
    /// The provider answered with something we could not read.
    InvalidResponse { reason: String },
    /// The message itself cannot be sent.
    InvalidMessage { reason: String },
}

impl fmt::Display for MailerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "email provider timed out"),
            Self::Transport { reason } => write!(f, "email provider unreachable: {reason}"),
            Self::Rejected { status, body } => {
                write!(f, "email provider rejected request (HTTP {status}): {body}")
            }
            Self::InvalidResponse { reason } => {
                write!(f, "unreadable email provider response: {reason}")
            }
            Self::InvalidMessage { reason } => write!(f, "invalid email message: {reason}"),
        }
    }
}

impl std::error::Error for MailerError {}
