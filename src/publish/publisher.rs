// src/publish/publisher.rs

use crate::domain::ReportDate;
use crate::errors::ReportResult;
use crate::publish::email::ReportEmail;
use crate::publish::mail::MailTransport;
use crate::publish::storage::{archive_key, ObjectStore};
use crate::report::ReportFile;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Where a finished report goes.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishTarget {
    pub bucket: String,
    pub prefix: String,
    pub sender: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Sent { message_id: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub key: String,
    pub notification: Notification,
}

/// Archives a report and then emails it.
///
/// Archival errors propagate and stop the run before any email is sent.
/// Email errors are logged and reported in the outcome only.
pub struct Publisher<'a> {
    store: &'a dyn ObjectStore,
    mailer: &'a dyn MailTransport,
    target: &'a PublishTarget,
}

impl<'a> Publisher<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        mailer: &'a dyn MailTransport,
        target: &'a PublishTarget,
    ) -> Self {
        Self {
            store,
            mailer,
            target,
        }
    }

    pub async fn publish(
        &self,
        report: &ReportFile,
        date: ReportDate,
        archive_date: NaiveDate,
    ) -> ReportResult<PublishOutcome> {
        let key = self.archive(report, archive_date).await?;
        let notification = self.notify(report, date).await;
        Ok(PublishOutcome { key, notification })
    }

    pub async fn archive(&self, report: &ReportFile, archive_date: NaiveDate) -> ReportResult<String> {
        let key = archive_key(&self.target.prefix, archive_date, report.file_name()?);
        self.store
            .put_file(&self.target.bucket, &key, &report.path)
            .await?;

        info!(bucket = %self.target.bucket, key = %key, "Report archived");
        Ok(key)
    }

    pub async fn notify(&self, report: &ReportFile, date: ReportDate) -> Notification {
        let sent = match ReportEmail::for_report(
            date,
            &self.target.sender,
            &self.target.recipients,
            report,
        ) {
            Ok(email) => self.mailer.send(&email).await,
            Err(e) => Err(e),
        };

        match sent {
            Ok(message_id) => {
                info!(message_id = %message_id, "Email sent");
                Notification::Sent { message_id }
            }
            Err(e) => {
                warn!(error = %e, "Email not sent");
                Notification::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
