// src/collector/collector.rs

use crate::collector::search::{capture_expression, ConfigSearch, SearchPage};
use crate::domain::{ChangeRecord, ReportDate};
use crate::errors::{ReportError, ReportResult};
use std::collections::HashSet;
use tracing::{debug, info};

/// Fetches every change captured on `date`, following continuation tokens
/// until the service stops returning one.
///
/// Records keep the page-concatenation order. Any failure discards the
/// partial collection.
pub async fn collect_changes(
    search: &dyn ConfigSearch,
    aggregator: &str,
    date: ReportDate,
) -> ReportResult<Vec<ChangeRecord>> {
    let expression = capture_expression(date);
    let mut records = Vec::new();
    let mut next_token: Option<String> = None;
    let mut seen_tokens = HashSet::new();
    let mut page = 0usize;

    loop {
        page += 1;

        let SearchPage {
            results,
            next_token: token,
        } = search
            .search(&expression, aggregator, next_token.as_deref())
            .await?;

        debug!(
            page,
            entries = results.len(),
            has_more = token.is_some(),
            "Fetched change page"
        );

        for raw in &results {
            let record = ChangeRecord::from_json(raw)?;
            check_window(&record, date)?;
            records.push(record);
        }

        match token {
            Some(token) => {
                if !seen_tokens.insert(token.clone()) {
                    return Err(ReportError::Query(format!(
                        "Continuation token repeated on page {page}"
                    )));
                }
                next_token = Some(token);
            }
            None => break,
        }
    }

    info!(
        aggregator,
        date = %date,
        pages = page,
        records = records.len(),
        "Collected configuration changes"
    );

    Ok(records)
}

fn check_window(record: &ChangeRecord, date: ReportDate) -> ReportResult<()> {
    match record.capture_time() {
        Some(capture) if date.covers(capture) => Ok(()),
        Some(capture) => Err(ReportError::Query(format!(
            "Record captured at {capture} is outside {date}"
        ))),
        None => Err(ReportError::Query(
            "Record has no capture timestamp".to_string(),
        )),
    }
}
