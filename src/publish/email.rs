// src/publish/email.rs

use crate::domain::ReportDate;
use crate::errors::{ReportError, ReportResult};
use crate::report::ReportFile;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::Message;

/// The daily notification, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEmail {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

impl ReportEmail {
    /// Builds the canned report email. The attachment is re-read from the
    /// local report file.
    pub fn for_report(
        date: ReportDate,
        sender: &str,
        recipients: &[String],
        report: &ReportFile,
    ) -> ReportResult<Self> {
        let attachment_name = report
            .file_name()
            .map_err(|e| ReportError::Notification(e.to_string()))?
            .to_string();
        let attachment = std::fs::read(&report.path).map_err(|e| {
            ReportError::Notification(format!(
                "Cannot read attachment {}: {e}",
                report.path.display()
            ))
        })?;

        Ok(Self {
            sender: sender.to_string(),
            recipients: recipients.to_vec(),
            subject: format!("AWS Config changes report for {date}"),
            text_body: format!(
                "Hello,\r\nPlease see the attached file which includes the configuration changes recorded on {date}."
            ),
            html_body: format!(
                r#"<html>
<head></head>
<body>
<p>Hello All,</p>
<p>Please find attached the configuration changes report for {date}. It contains every configuration change recorded by AWS Config across all aggregated accounts and regions.</p>
<p>Regards,<br/>AWS Config Reporting</p>
</body>
</html>
"#
            ),
            attachment_name,
            attachment,
        })
    }

    /// Raw RFC 5322 message: multipart/mixed holding a text/html
    /// alternative part followed by the CSV attachment.
    pub fn to_mime(&self) -> ReportResult<Vec<u8>> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.sender)?)
            .subject(self.subject.as_str());
        for recipient in &self.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let content_type = ContentType::parse(mime::TEXT_CSV.as_ref())
            .map_err(|e| ReportError::Notification(format!("Invalid content type: {e}")))?;

        let message = builder
            .multipart(
                MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(
                        self.text_body.clone(),
                        self.html_body.clone(),
                    ))
                    .singlepart(
                        Attachment::new(self.attachment_name.clone())
                            .body(self.attachment.clone(), content_type),
                    ),
            )
            .map_err(|e| ReportError::Notification(format!("Cannot build message: {e}")))?;

        Ok(message.formatted())
    }
}

fn parse_mailbox(address: &str) -> ReportResult<Mailbox> {
    address
        .parse()
        .map_err(|e| ReportError::Notification(format!("Invalid address '{address}': {e}")))
}
