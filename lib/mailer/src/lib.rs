//! Transactional email for the reunion ticketing platform.
//!
//! Handlers render a template, build an [`EmailMessage`], and hand it to an
//! [`EmailSender`]. [`ResendClient`] is the production sender.

pub mod config;
pub mod error;
pub mod message;
pub mod resend;
pub mod sender;
pub mod templates;

pub use config::MailerConfig;
pub use error::MailerError;
pub use message::{EmailMessage, MAX_BULK_RECIPIENTS, SendReceipt};
pub use resend::ResendClient;
pub use sender::{BatchOutcome, EmailSender};
