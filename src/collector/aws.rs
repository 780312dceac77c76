// src/collector/aws.rs

use crate::collector::search::{ConfigSearch, SearchPage};
use crate::errors::{ReportError, ReportResult};
use async_trait::async_trait;
use aws_sdk_config::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_config::operation::select_aggregate_resource_config::SelectAggregateResourceConfigError;
use aws_sdk_config::Client;

const AUTH_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidClientTokenId",
    "InvalidSignatureException",
    "SignatureDoesNotMatch",
    "MissingAuthenticationToken",
    "IncompleteSignature",
    "AuthFailure",
];

/// `SelectAggregateResourceConfig` against an AWS Config aggregator.
pub struct AwsConfigSearch {
    client: Client,
}

impl AwsConfigSearch {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigSearch for AwsConfigSearch {
    async fn search(
        &self,
        expression: &str,
        aggregator: &str,
        next_token: Option<&str>,
    ) -> ReportResult<SearchPage> {
        let output = self
            .client
            .select_aggregate_resource_config()
            .expression(expression)
            .configuration_aggregator_name(aggregator)
            .set_next_token(next_token.map(str::to_owned))
            .send()
            .await
            .map_err(map_search_error)?;

        Ok(SearchPage {
            results: output.results().to_vec(),
            next_token: output
                .next_token()
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        })
    }
}

fn map_search_error<R>(err: SdkError<SelectAggregateResourceConfigError, R>) -> ReportError
where
    R: std::fmt::Debug + 'static,
{
    let code = err.code().map(str::to_owned);
    let message = DisplayErrorContext(&err).to_string();
    classify_search_error(code.as_deref(), message)
}

/// Maps an AWS error code from the search API onto the collection error taxonomy.
pub(crate) fn classify_search_error(code: Option<&str>, message: String) -> ReportError {
    match code {
        Some("NoSuchConfigurationAggregatorException") => ReportError::NotFound(message),
        Some(c)
            if c.starts_with("AccessDenied")
                || c.starts_with("ExpiredToken")
                || AUTH_ERROR_CODES.contains(&c) =>
        {
            ReportError::Authentication(message)
        }
        _ => ReportError::Query(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_aws_error_codes() {
        let msg = || "boom".to_string();

        assert!(matches!(
            classify_search_error(Some("NoSuchConfigurationAggregatorException"), msg()),
            ReportError::NotFound(_)
        ));
        assert!(matches!(
            classify_search_error(Some("AccessDeniedException"), msg()),
            ReportError::Authentication(_)
        ));
        assert!(matches!(
            classify_search_error(Some("ExpiredTokenException"), msg()),
            ReportError::Authentication(_)
        ));
        assert!(matches!(
            classify_search_error(Some("UnrecognizedClientException"), msg()),
            ReportError::Authentication(_)
        ));
        assert!(matches!(
            classify_search_error(Some("InvalidNextTokenException"), msg()),
            ReportError::Query(_)
        ));
        assert!(matches!(
            classify_search_error(Some("InvalidExpressionException"), msg()),
            ReportError::Query(_)
        ));
        assert!(matches!(
            classify_search_error(None, msg()),
            ReportError::Query(_)
        ));
    }
}
