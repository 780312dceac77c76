// Wire-level checks for the AWS adapters against canned HTTP exchanges.

use crate::collector::{collect_changes, AwsConfigSearch};
use crate::domain::{ReportDate, RESOURCE_ID_FIELD};
use crate::errors::ReportError;
use crate::publish::{MailTransport, ObjectStore, ReportEmail, S3Store, SesMailer};
use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_types::body::SdkBody;
use std::io::Write;

fn exchange(status: u16, content_type: &str, body: &str) -> ReplayEvent {
    ReplayEvent::new(
        http::Request::builder()
            .uri("https://replay.invalid/")
            .body(SdkBody::empty())
            .unwrap(),
        http::Response::builder()
            .status(status)
            .header("content-type", content_type)
            .body(SdkBody::from(body.to_string()))
            .unwrap(),
    )
}

fn config_json(status: u16, body: &str) -> ReplayEvent {
    exchange(status, "application/x-amz-json-1.1", body)
}

fn config_client(replay: &StaticReplayClient) -> aws_sdk_config::Client {
    use aws_sdk_config::config::{BehaviorVersion, Credentials, Region};
    let conf = aws_sdk_config::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .region(Region::new("us-east-1"))
        .http_client(replay.clone())
        .build();
    aws_sdk_config::Client::from_conf(conf)
}

fn s3_client(replay: &StaticReplayClient) -> aws_sdk_s3::Client {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    let conf = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .region(Region::new("us-east-1"))
        .http_client(replay.clone())
        .build();
    aws_sdk_s3::Client::from_conf(conf)
}

fn ses_client(replay: &StaticReplayClient) -> aws_sdk_ses::Client {
    use aws_sdk_ses::config::{BehaviorVersion, Credentials, Region};
    let conf = aws_sdk_ses::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .region(Region::new("us-east-1"))
        .http_client(replay.clone())
        .build();
    aws_sdk_ses::Client::from_conf(conf)
}

fn request_bodies(replay: &StaticReplayClient) -> Vec<String> {
    replay
        .actual_requests()
        .map(|r| String::from_utf8_lossy(r.body().bytes().unwrap_or_default()).into_owned())
        .collect()
}

fn item(id: &str) -> String {
    serde_json::json!({
        "awsRegion": "us-east-1",
        "resourceId": id,
        "resourceType": "AWS::EC2::Instance",
        "configurationItemCaptureTime": "2024-01-01T04:00:00.000Z"
    })
    .to_string()
}

fn select_response(items: &[String], next_token: &str) -> String {
    serde_json::json!({
        "Results": items,
        "QueryInfo": {"SelectFields": [{"Name": "*"}]},
        "NextToken": next_token
    })
    .to_string()
}

#[tokio::test]
async fn config_search_pages_until_token_is_empty() {
    let replay = StaticReplayClient::new(vec![
        config_json(200, &select_response(&[item("i-1"), item("i-2")], "page-2")),
        config_json(200, &select_response(&[item("i-3")], "")),
    ]);
    let search = AwsConfigSearch::new(config_client(&replay));
    let date = ReportDate::parse("2024-01-01").unwrap();

    let records = collect_changes(&search, "org-aggregator", date).await.unwrap();

    let ids: Vec<&str> = records
        .iter()
        .map(|r| r.get_str(RESOURCE_ID_FIELD).unwrap())
        .collect();
    assert_eq!(ids, vec!["i-1", "i-2", "i-3"]);

    let bodies = request_bodies(&replay);
    assert_eq!(bodies.len(), 2);

    let first: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(
        first["Expression"],
        "SELECT * WHERE configurationItemCaptureTime LIKE '2024-01-01%'"
    );
    assert_eq!(first["ConfigurationAggregatorName"], "org-aggregator");
    assert!(first.get("NextToken").is_none());

    let second: serde_json::Value = serde_json::from_str(&bodies[1]).unwrap();
    assert_eq!(second["NextToken"], "page-2");
}

#[tokio::test]
async fn config_search_maps_missing_aggregator() {
    let replay = StaticReplayClient::new(vec![config_json(
        400,
        r#"{"__type":"NoSuchConfigurationAggregatorException","message":"The configuration aggregator does not exist."}"#,
    )]);
    let search = AwsConfigSearch::new(config_client(&replay));
    let date = ReportDate::parse("2024-01-01").unwrap();

    let err = collect_changes(&search, "missing", date).await.unwrap_err();
    assert!(matches!(err, ReportError::NotFound(_)));
}

#[tokio::test]
async fn config_search_maps_access_denied() {
    let replay = StaticReplayClient::new(vec![config_json(
        400,
        r#"{"__type":"AccessDeniedException","message":"not authorized"}"#,
    )]);
    let search = AwsConfigSearch::new(config_client(&replay));
    let date = ReportDate::parse("2024-01-01").unwrap();

    let err = collect_changes(&search, "org-aggregator", date).await.unwrap_err();
    assert!(matches!(err, ReportError::Authentication(_)));
}

#[tokio::test]
async fn s3_put_targets_bucket_and_key() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"a,b\n1,2\n").unwrap();

    let replay = StaticReplayClient::new(vec![exchange(200, "application/xml", "")]);
    let store = S3Store::new(s3_client(&replay));

    store
        .put_file(
            "audit-bucket",
            "daily-config-report/2024/01/02/config_report_2024-01-01.csv",
            file.path(),
        )
        .await
        .unwrap();

    let requests: Vec<_> = replay.actual_requests().collect();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].uri().contains("audit-bucket"));
    assert!(requests[0]
        .uri()
        .contains("daily-config-report/2024/01/02/config_report_2024-01-01.csv"));
    assert_eq!(requests[0].headers().get("content-type"), Some("text/csv"));
}

#[tokio::test]
async fn s3_access_denied_is_a_storage_error() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let replay = StaticReplayClient::new(vec![exchange(
        403,
        "application/xml",
        "<Error><Code>AccessDenied</Code><Message>Access Denied</Message><RequestId>R1</RequestId></Error>",
    )]);
    let store = S3Store::new(s3_client(&replay));

    let err = store
        .put_file("audit-bucket", "k.csv", file.path())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Storage(_)));
}

fn report_email() -> ReportEmail {
    ReportEmail {
        sender: "reports@example.com".into(),
        recipients: vec!["ops@example.com".into()],
        subject: "AWS Config changes report for 2024-01-01".into(),
        text_body: "Hello".into(),
        html_body: "<p>Hello</p>".into(),
        attachment_name: "config_report_2024-01-01.csv".into(),
        attachment: b"a\n1\n".to_vec(),
    }
}

#[tokio::test]
async fn ses_sends_raw_message_and_returns_id() {
    let replay = StaticReplayClient::new(vec![exchange(
        200,
        "text/xml",
        r#"<SendRawEmailResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <SendRawEmailResult><MessageId>0100018c-abc</MessageId></SendRawEmailResult>
  <ResponseMetadata><RequestId>R1</RequestId></ResponseMetadata>
</SendRawEmailResponse>"#,
    )]);
    let mailer = SesMailer::new(ses_client(&replay));

    let id = mailer.send(&report_email()).await.unwrap();
    assert_eq!(id, "0100018c-abc");

    let bodies = request_bodies(&replay);
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("Action=SendRawEmail"));
    assert!(bodies[0].contains("Source=reports%40example.com"));
    assert!(bodies[0].contains("Destinations.member.1=ops%40example.com"));
    assert!(bodies[0].contains("RawMessage.Data="));
}

#[tokio::test]
async fn ses_rejection_is_a_notification_error() {
    let replay = StaticReplayClient::new(vec![exchange(
        400,
        "text/xml",
        r#"<ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <Error><Type>Sender</Type><Code>MessageRejected</Code><Message>Email address is not verified.</Message></Error>
  <RequestId>R1</RequestId>
</ErrorResponse>"#,
    )]);
    let mailer = SesMailer::new(ses_client(&replay));

    let err = mailer.send(&report_email()).await.unwrap_err();
    assert!(!err.is_fatal());
    assert!(matches!(err, ReportError::Notification(_)));
}
