// src/publish/brevo.rs

use crate::errors::{ReportError, ReportResult};
use crate::publish::email::ReportEmail;
use crate::publish::mail::MailTransport;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const BREVO_API: &str = "https://api.brevo.com";
const SENDER_NAME: &str = "AWS Config Reporting";

/// Brevo transactional email API (`POST /v3/smtp/email`).
pub struct BrevoMailer {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoAttachment<'a> {
    name: &'a str,
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
    attachment: Vec<BrevoAttachment<'a>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoResponse {
    message_id: String,
}

impl BrevoMailer {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BREVO_API)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl MailTransport for BrevoMailer {
    async fn send(&self, email: &ReportEmail) -> ReportResult<String> {
        let payload = BrevoPayload {
            sender: BrevoSender {
                name: SENDER_NAME,
                email: &email.sender,
            },
            to: email
                .recipients
                .iter()
                .map(|r| BrevoRecipient { email: r })
                .collect(),
            subject: &email.subject,
            html_content: &email.html_body,
            text_content: &email.text_body,
            attachment: vec![BrevoAttachment {
                name: &email.attachment_name,
                content: STANDARD.encode(&email.attachment),
            }],
        };

        let resp = self
            .client
            .post(format!("{}/v3/smtp/email", self.base_url.trim_end_matches('/')))
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReportError::Notification(format!("Request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".to_string());
            return Err(ReportError::Notification(format!(
                "Brevo API error: {status} - {body}"
            )));
        }

        let parsed: BrevoResponse = resp
            .json()
            .await
            .map_err(|e| ReportError::Notification(format!("Unexpected Brevo response: {e}")))?;

        Ok(parsed.message_id)
    }
}
