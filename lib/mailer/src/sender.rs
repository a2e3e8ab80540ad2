//! The delivery seam used by the HTTP handlers.

use crate::error::MailerError;
use crate::message::{EmailMessage, SendReceipt};
use async_trait::async_trait;
use rootcause::Report;

/// What happened to a batch.
///
/// `receipts` cover the messages accepted before `failure`, in input order.
/// When `failure` is set, the remaining messages were not sent.
#[derive(Debug)]
pub struct BatchOutcome {
    pub receipts: Vec<SendReceipt>,
    pub failure: Option<Report<MailerError>>,
}

impl BatchOutcome {
    pub fn delivered(receipts: Vec<SendReceipt>) -> Self {
        Self {
            receipts,
            failure: None,
        }
    }

    pub fn interrupted(receipts: Vec<SendReceipt>, failure: Report<MailerError>) -> Self {
        Self {
            receipts,
            failure: Some(failure),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Something that can deliver email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, Report<MailerError>>;

    /// Sends several messages, stopping at the first failure.
    ///
    /// The default sends one at a time.
    async fn send_batch(&self, messages: Vec<EmailMessage>) -> BatchOutcome {
        let mut receipts = Vec::with_capacity(messages.len());
        for message in messages {
            match self.send(message).await {
                Ok(receipt) => receipts.push(receipt),
                Err(report) => return BatchOutcome::interrupted(receipts, report),
            }
        }
        BatchOutcome::delivered(receipts)
    }
}
