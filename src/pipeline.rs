// src/pipeline.rs

use crate::collector::{collect_changes, ConfigSearch};
use crate::config::RunSettings;
use crate::domain::ReportDate;
use crate::errors::ReportResult;
use crate::publish::{MailTransport, ObjectStore, PublishOutcome, Publisher};
use crate::report::{build_report, ReportFile};
use chrono::{Local, NaiveDate};
use tracing::info;

/// The external services one run talks to.
pub struct Collaborators<'a> {
    pub search: &'a dyn ConfigSearch,
    pub store: &'a dyn ObjectStore,
    pub mailer: &'a dyn MailTransport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub report_date: ReportDate,
    pub report: ReportFile,
    /// `None` on a dry run.
    pub publish: Option<PublishOutcome>,
}

pub async fn run(settings: &RunSettings, services: &Collaborators<'_>) -> ReportResult<RunSummary> {
    run_with_clock(settings, services, || Local::now().date_naive()).await
}

/// Collect → build → publish.
///
/// `today` is the host's local date. It is read once for the default report
/// date and again at publish time for the archive partition.
pub async fn run_with_clock(
    settings: &RunSettings,
    services: &Collaborators<'_>,
    today: fn() -> NaiveDate,
) -> ReportResult<RunSummary> {
    let date = settings
        .report_date
        .unwrap_or_else(|| ReportDate::from(today()));
    info!(aggregator = %settings.aggregator_name, date = %date, "Starting config change report");

    let records = collect_changes(services.search, &settings.aggregator_name, date).await?;
    let report = build_report(records, date, &settings.report_dir)?;

    if settings.dry_run {
        info!(path = %report.path.display(), "Dry run, skipping archival and email");
        return Ok(RunSummary {
            report_date: date,
            report,
            publish: None,
        });
    }

    let publisher = Publisher::new(services.store, services.mailer, &settings.target);
    let outcome = publisher.publish(&report, date, today()).await?;

    Ok(RunSummary {
        report_date: date,
        report,
        publish: Some(outcome),
    })
}
