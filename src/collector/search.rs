// src/collector/search.rs

use crate::domain::{ReportDate, CAPTURE_TIME_FIELD};
use crate::errors::ReportResult;
use async_trait::async_trait;

/// One page of aggregator query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Each entry is a JSON-serialized configuration item.
    pub results: Vec<String>,
    pub next_token: Option<String>,
}

/// Configuration-snapshot search, one request per call.
#[async_trait]
pub trait ConfigSearch: Send + Sync {
    async fn search(
        &self,
        expression: &str,
        aggregator: &str,
        next_token: Option<&str>,
    ) -> ReportResult<SearchPage>;
}

/// Advanced-query expression selecting every item captured on `date`.
pub fn capture_expression(date: ReportDate) -> String {
    format!(
        "SELECT * WHERE {CAPTURE_TIME_FIELD} LIKE '{}%'",
        date.query_prefix()
    )
}
