// src/domain/record.rs

use crate::errors::{ReportError, ReportResult};
use serde_json::{Map, Value};

pub const REGION_FIELD: &str = "awsRegion";
pub const RESOURCE_ID_FIELD: &str = "resourceId";
pub const RESOURCE_TYPE_FIELD: &str = "resourceType";
pub const CAPTURE_TIME_FIELD: &str = "configurationItemCaptureTime";

/// Derived column, never present in the upstream record.
pub const LINK_FIELD: &str = "Link";

/// One configuration-item change as returned by the aggregator.
///
/// The schema is open: apart from the region, resource id, resource type and
/// capture time, every field depends on the resource type, so the record is
/// kept as a plain field-name → value map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeRecord(Map<String, Value>);

impl ChangeRecord {
    /// Parses one serialized result entry. Anything other than a JSON object is rejected.
    pub fn from_json(raw: &str) -> ReportResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ReportError::Query(format!("Malformed result entry: {e}")))?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ReportError::Query(format!(
                "Result entry is not an object: {other}"
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of a field, `None` if absent or not a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn capture_time(&self) -> Option<&str> {
        self.get_str(CAPTURE_TIME_FIELD)
    }
}

impl From<Map<String, Value>> for ChangeRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
