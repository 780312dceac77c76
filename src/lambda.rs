// src/lambda.rs

use crate::config::RunSettings;
use crate::domain::ReportDate;
use crate::errors::ReportResult;
use crate::pipeline::{run_with_clock, Collaborators, RunSummary};
use crate::publish::Notification;
use chrono::{Local, NaiveDate};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Payload of a scheduled invocation.
///
/// EventBridge schedules deliver `{"detail-type": "Scheduled Event",
/// "detail": {}, ...}`. A backfill can set `report_date` at the top level or
/// inside `detail`; the top level wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduledInvocation {
    #[serde(default)]
    pub report_date: Option<String>,
    #[serde(default)]
    pub detail: Option<InvocationDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvocationDetail {
    #[serde(default)]
    pub report_date: Option<String>,
}

impl ScheduledInvocation {
    pub fn report_date(&self) -> ReportResult<Option<ReportDate>> {
        self.report_date
            .as_deref()
            .or_else(|| self.detail.as_ref().and_then(|d| d.report_date.as_deref()))
            .map(ReportDate::parse)
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub report_date: String,
    pub rows: usize,
    pub archive_key: Option<String>,
    /// `sent`, `failed` or `skipped` (dry run).
    pub email_status: &'static str,
    pub message_id: Option<String>,
}

impl From<RunSummary> for InvocationResponse {
    fn from(summary: RunSummary) -> Self {
        let (archive_key, email_status, message_id) = match summary.publish {
            None => (None, "skipped", None),
            Some(outcome) => match outcome.notification {
                Notification::Sent { message_id } => (Some(outcome.key), "sent", Some(message_id)),
                Notification::Failed { .. } => (Some(outcome.key), "failed", None),
            },
        };

        Self {
            report_date: summary.report_date.to_string(),
            rows: summary.report.rows,
            archive_key,
            email_status,
            message_id,
        }
    }
}

/// One invocation against already-resolved settings.
pub async fn handle_invocation(
    invocation: ScheduledInvocation,
    settings: &RunSettings,
    services: &Collaborators<'_>,
    today: fn() -> NaiveDate,
) -> ReportResult<InvocationResponse> {
    let mut settings = settings.clone();
    if let Some(date) = invocation.report_date()? {
        settings.report_date = Some(date);
    }

    let summary = run_with_clock(&settings, services, today).await?;
    Ok(InvocationResponse::from(summary))
}

/// Fatal errors become an `Err` so the invocation is reported as failed.
pub async fn handle_event(
    event: LambdaEvent<ScheduledInvocation>,
    settings: &RunSettings,
    services: &Collaborators<'_>,
    today: fn() -> NaiveDate,
) -> Result<InvocationResponse, Error> {
    let request_id = event.context.request_id.clone();

    match handle_invocation(event.payload, settings, services, today).await {
        Ok(response) => {
            info!(
                request_id = %request_id,
                date = %response.report_date,
                rows = response.rows,
                email = response.email_status,
                "Invocation complete"
            );
            Ok(response)
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Invocation failed");
            Err(e.into())
        }
    }
}

pub async fn serve(settings: &RunSettings, services: &Collaborators<'_>) -> Result<(), Error> {
    lambda_runtime::run(service_fn(|event| {
        handle_event(event, settings, services, || Local::now().date_naive())
    }))
    .await
}
