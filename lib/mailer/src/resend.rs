//! [`EmailSender`] backed by the Resend HTTP API.

use crate::config::MailerConfig;
use crate::error::MailerError;
use crate::message::{EmailMessage, SendReceipt};
use crate::sender::{BatchOutcome, EmailSender};
use async_trait::async_trait;
use rootcause::Report;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Messages accepted by one call to the batch endpoint.
const BATCH_CHUNK_SIZE: usize = 100;

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    data: Vec<SendReceipt>,
}

/// Resend API client.
pub struct ResendClient {
    http: reqwest::Client,
    config: MailerConfig,
}

impl ResendClient {
    pub fn new(config: MailerConfig) -> Result<Self, Report<MailerError>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| MailerError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn payload<'a>(&'a self, message: &'a EmailMessage) -> SendPayload<'a> {
        SendPayload {
            from: &self.config.from_address,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: message.text.as_deref(),
            reply_to: message.reply_to.as_deref(),
        }
    }

    fn interrupted(&self, receipts: Vec<SendReceipt>, report: Report<MailerError>) -> BatchOutcome {
        tracing::warn!(
            sent = receipts.len(),
            error = %report,
            "Email batch stopped early"
        );
        BatchOutcome::interrupted(receipts, report)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Report<MailerError>>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Send,
    {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, endpoint = %url, "Failed to reach email provider");
                if e.is_timeout() {
                    MailerError::Timeout
                } else {
                    MailerError::Transport {
                        reason: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                endpoint = %url,
                status = %status,
                body = %body,
                "Email provider returned error"
            );
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(response
            .json::<R>()
            .await
            .map_err(|e| MailerError::InvalidResponse {
                reason: e.to_string(),
            })?)
    }
}

/// A chunk whose receipts cannot be matched to its messages counts as failed.
fn check_receipt_count(expected: usize, response: &BatchResponse) -> Result<(), Report<MailerError>> {
    if response.data.len() != expected {
        return Err(MailerError::InvalidResponse {
            reason: format!("expected {} receipts, got {}", expected, response.data.len()),
        }
        .into());
    }
    Ok(())
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, Report<MailerError>> {
        if message.to.is_empty() {
            return Err(MailerError::InvalidMessage {
                reason: "no recipients".to_string(),
            }
            .into());
        }
        let receipt: SendReceipt = self.post("emails", &self.payload(&message)).await?;
        tracing::info!(
            email_id = %receipt.id,
            recipients = message.to.len(),
            "Sent email"
        );
        Ok(receipt)
    }

    async fn send_batch(&self, messages: Vec<EmailMessage>) -> BatchOutcome {
        let mut receipts = Vec::with_capacity(messages.len());
        for chunk in messages.chunks(BATCH_CHUNK_SIZE) {
            let payloads: Vec<SendPayload<'_>> = chunk.iter().map(|m| self.payload(m)).collect();
            let response: BatchResponse = match self.post("emails/batch", payloads.as_slice()).await
            {
                Ok(response) => response,
                Err(report) => return self.interrupted(receipts, report),
            };
            if let Err(report) = check_receipt_count(chunk.len(), &response) {
                return self.interrupted(receipts, report);
            }
            receipts.extend(response.data);
        }
        tracing::info!(sent = receipts.len(), "Sent email batch");
        BatchOutcome::delivered(receipts)
    }
}
