// src/config.rs

use crate::domain::ReportDate;
use crate::errors::{ReportError, ReportResult};
use crate::publish::PublishTarget;
use clap::{Parser, ValueEnum};
use lettre::message::Mailbox;
use std::path::PathBuf;

/// How the binary is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// One run, then exit.
    Once,
    /// Serve scheduled invocations through the AWS Lambda runtime API.
    Lambda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MailProvider {
    Ses,
    Brevo,
}

/// Command-line / environment options for one report run.
#[derive(Debug, Clone, Parser)]
#[command(name = "config-change-report", about = "Daily AWS Config change report")]
pub struct ReportConfig {
    /// Configuration aggregator to query.
    #[arg(long, env = "AGGREGATOR_NAME")]
    pub aggregator_name: String,

    #[arg(long, env = "REPORT_SENDER")]
    pub sender: String,

    #[arg(
        long = "recipient",
        env = "REPORT_RECIPIENTS",
        value_delimiter = ',',
        required = true
    )]
    pub recipients: Vec<String>,

    /// S3 bucket receiving the archived report.
    #[arg(long, env = "REPORT_BUCKET")]
    pub bucket: String,

    #[arg(long, env = "REPORT_PREFIX", default_value = "daily-config-report")]
    pub prefix: String,

    #[arg(long, env = "REPORT_MODE", value_enum, default_value_t = RunMode::Once)]
    pub mode: RunMode,

    /// Day to report on (YYYY-MM-DD). Defaults to today on the local clock.
    #[arg(long, env = "REPORT_DATE")]
    pub report_date: Option<ReportDate>,

    #[arg(long, env = "REPORT_DIR", default_value = "/tmp")]
    pub report_dir: PathBuf,

    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    #[arg(long, env = "MAIL_PROVIDER", value_enum, default_value_t = MailProvider::Ses)]
    pub mail_provider: MailProvider,

    #[arg(long, env = "BREVO_API_KEY", hide_env_values = true)]
    pub brevo_api_key: Option<String>,

    /// Build the report but skip archival and email.
    #[arg(long, env = "REPORT_DRY_RUN")]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MailSettings {
    Ses,
    Brevo { api_key: String },
}

/// Fully validated settings. Built before any stage touches the network.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub aggregator_name: String,
    /// `None` means today, read when the run starts.
    pub report_date: Option<ReportDate>,
    pub report_dir: PathBuf,
    pub region: Option<String>,
    pub dry_run: bool,
    pub target: PublishTarget,
    pub mail: MailSettings,
}

impl ReportConfig {
    pub fn resolve(self) -> ReportResult<RunSettings> {
        let aggregator_name = non_empty("aggregator name", self.aggregator_name)?;
        let bucket = non_empty("bucket", self.bucket)?;

        let sender = validate_address(self.sender)?;
        let recipients = self
            .recipients
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .map(validate_address)
            .collect::<ReportResult<Vec<_>>>()?;
        if recipients.is_empty() {
            return Err(ReportError::Config("At least one recipient is required".into()));
        }

        if !self.report_dir.is_dir() {
            return Err(ReportError::Config(format!(
                "Report directory {} does not exist",
                self.report_dir.display()
            )));
        }

        let mail = match self.mail_provider {
            MailProvider::Ses => MailSettings::Ses,
            MailProvider::Brevo => MailSettings::Brevo {
                api_key: self
                    .brevo_api_key
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        ReportError::Config("BREVO_API_KEY is required for the brevo provider".into())
                    })?,
            },
        };

        Ok(RunSettings {
            aggregator_name,
            report_date: self.report_date,
            report_dir: self.report_dir,
            region: self.region.filter(|r| !r.trim().is_empty()),
            dry_run: self.dry_run,
            target: PublishTarget {
                bucket,
                prefix: self.prefix,
                sender,
                recipients,
            },
            mail,
        })
    }
}

fn non_empty(what: &str, value: String) -> ReportResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        Err(ReportError::Config(format!("The {what} must not be empty")))
    } else {
        Ok(value)
    }
}

/// Keeps only the bare address; display names are dropped.
fn validate_address(address: String) -> ReportResult<String> {
    let address = address.trim();
    let mailbox = address
        .parse::<Mailbox>()
        .map_err(|e| ReportError::Config(format!("Invalid email address '{address}': {e}")))?;
    Ok(mailbox.email.to_string())
}
