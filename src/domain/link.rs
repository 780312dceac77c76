// src/domain/link.rs

use urlencoding::encode;

/// Deep link to the resource timeline in the AWS Config console.
///
/// Each substituted component is percent-encoded; identifiers come straight
/// from upstream records and may contain `&`, `#`, `/` or spaces.
pub fn console_link(region: &str, resource_id: &str, resource_type: &str) -> String {
    let region = encode(region);
    format!(
        "https://{region}.console.aws.amazon.com/config/home?region={region}#/resources/timeline?resourceId={}&resourceType={}",
        encode(resource_id),
        encode(resource_type),
    )
}
