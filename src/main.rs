use crate::collector::AwsConfigSearch;
use crate::config::{MailSettings, ReportConfig, RunMode, RunSettings};
use crate::pipeline::{Collaborators, RunSummary};
use crate::publish::{BrevoMailer, MailTransport, Notification, S3Store, SesMailer};
use aws_config::{BehaviorVersion, Region};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod collector;
mod config;
mod domain;
mod errors;
mod lambda;
mod pipeline;
mod publish;
mod report;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let config = ReportConfig::parse();
    let mode = config.mode;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(mode == RunMode::Once)
        .compact()
        .init();

    // Resolve everything up front; nothing below may fail on configuration.
    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let aws = AwsServices::connect(&settings).await;
    let services = aws.collaborators();

    match mode {
        RunMode::Once => match pipeline::run(&settings, &services).await {
            Ok(summary) => {
                log_summary(&summary);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, fatal = e.is_fatal(), "Report run failed");
                ExitCode::FAILURE
            }
        },
        RunMode::Lambda => {
            info!(aggregator = %settings.aggregator_name, "Serving Lambda invocations");
            match lambda::serve(&settings, &services).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "Lambda runtime stopped");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Clients built once from the SDK default credential/region chain.
struct AwsServices {
    search: AwsConfigSearch,
    store: S3Store,
    mailer: Box<dyn MailTransport>,
}

impl AwsServices {
    async fn connect(settings: &RunSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk = loader.load().await;

        let mailer: Box<dyn MailTransport> = match &settings.mail {
            MailSettings::Ses => Box::new(SesMailer::new(aws_sdk_ses::Client::new(&sdk))),
            MailSettings::Brevo { api_key } => Box::new(BrevoMailer::new(api_key.clone())),
        };

        Self {
            search: AwsConfigSearch::new(aws_sdk_config::Client::new(&sdk)),
            store: S3Store::new(aws_sdk_s3::Client::new(&sdk)),
            mailer,
        }
    }

    fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            search: &self.search,
            store: &self.store,
            mailer: self.mailer.as_ref(),
        }
    }
}

fn log_summary(summary: &RunSummary) {
    match &summary.publish {
        Some(outcome) => {
            if let Notification::Failed { reason } = &outcome.notification {
                warn!(reason = %reason, "Report archived but not emailed");
            }
            info!(
                date = %summary.report_date,
                rows = summary.report.rows,
                key = %outcome.key,
                "Report run complete"
            );
        }
        None => info!(
            date = %summary.report_date,
            rows = summary.report.rows,
            path = %summary.report.path.display(),
            "Dry run complete"
        ),
    }
}
