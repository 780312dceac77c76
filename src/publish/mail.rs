// src/publish/mail.rs

use crate::errors::{ReportError, ReportResult};
use crate::publish::email::ReportEmail;
use async_trait::async_trait;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::primitives::Blob;
use aws_sdk_ses::types::RawMessage;
use aws_sdk_ses::Client;

/// A transactional email service. Returns the provider's message id.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &ReportEmail) -> ReportResult<String>;
}

/// Amazon SES `SendRawEmail`.
pub struct SesMailer {
    client: Client,
}

impl SesMailer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MailTransport for SesMailer {
    async fn send(&self, email: &ReportEmail) -> ReportResult<String> {
        let raw = RawMessage::builder()
            .data(Blob::new(email.to_mime()?))
            .build()
            .map_err(|e| ReportError::Notification(format!("Invalid raw message: {e}")))?;

        let output = self
            .client
            .send_raw_email()
            .source(email.sender.as_str())
            .set_destinations(Some(email.recipients.clone()))
            .raw_message(raw)
            .send()
            .await
            .map_err(|e| ReportError::Notification(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id().to_string())
    }
}
