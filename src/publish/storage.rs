// src/publish/storage.rs

use crate::errors::{ReportError, ReportResult};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::NaiveDate;
use std::path::Path;

/// Durable object storage for finished reports.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> ReportResult<()>;
}

/// `{prefix}/{YYYY}/{MM}/{DD}/{file_name}`
pub fn archive_key(prefix: &str, date: NaiveDate, file_name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let dated = date.format("%Y/%m/%d");
    if prefix.is_empty() {
        format!("{dated}/{file_name}")
    } else {
        format!("{prefix}/{dated}/{file_name}")
    }
}

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> ReportResult<()> {
        let body = ByteStream::from_path(path).await.map_err(|e| {
            ReportError::Storage(format!("Cannot read {}: {e}", path.display()))
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(mime::TEXT_CSV.as_ref())
            .body(body)
            .send()
            .await
            .map_err(|e| {
                ReportError::Storage(format!(
                    "Upload to s3://{bucket}/{key} failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}
