// src/report/csv_report.rs

use crate::domain::{
    console_link, ChangeRecord, ReportDate, LINK_FIELD, REGION_FIELD, RESOURCE_ID_FIELD,
    RESOURCE_TYPE_FIELD,
};
use crate::errors::{ReportError, ReportResult};
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// A report written to local disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub rows: usize,
}

impl ReportFile {
    /// Base name used for the archive key and the email attachment.
    pub fn file_name(&self) -> ReportResult<&str> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ReportError::Serialization(format!(
                    "Report path has no file name: {}",
                    self.path.display()
                ))
            })
    }
}

/// Adds the console `Link` column to every record.
pub fn enrich(records: &mut [ChangeRecord]) -> ReportResult<()> {
    for (idx, record) in records.iter_mut().enumerate() {
        let link = console_link(
            required(record, REGION_FIELD, idx)?,
            required(record, RESOURCE_ID_FIELD, idx)?,
            required(record, RESOURCE_TYPE_FIELD, idx)?,
        );
        record.insert(LINK_FIELD, link);
    }
    Ok(())
}

fn required<'a>(record: &'a ChangeRecord, field: &str, idx: usize) -> ReportResult<&'a str> {
    record.get_str(field).ok_or_else(|| {
        ReportError::Serialization(format!("Record {idx} has no string field '{field}'"))
    })
}

/// Sorted union of every field name across `records`.
pub fn header_union(records: &[ChangeRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(ChangeRecord::fields)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Flattens one value into a CSV cell. Nested values become compact JSON.
pub fn render_cell(value: Option<&Value>) -> ReportResult<String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(nested) => serde_json::to_string(nested)
            .map_err(|e| ReportError::Serialization(format!("Cannot render cell: {e}"))),
    }
}

/// Writes header + rows. With no records nothing at all is written.
pub fn write_csv<W: Write>(
    out: W,
    columns: &[String],
    records: &[ChangeRecord],
) -> ReportResult<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns).map_err(csv_error)?;

    for record in records {
        let row = columns
            .iter()
            .map(|column| render_cell(record.get(column)))
            .collect::<ReportResult<Vec<_>>>()?;
        writer.write_record(&row).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn csv_error(e: csv::Error) -> ReportError {
    ReportError::Serialization(format!("CSV write failed: {e}"))
}

/// Enriches `records` and writes them to `{dir}/config_report_{date}.csv`.
///
/// The file is written to a temporary sibling first and renamed into place,
/// so the final path either holds a complete report or nothing new.
pub fn build_report(
    mut records: Vec<ChangeRecord>,
    date: ReportDate,
    dir: &Path,
) -> ReportResult<ReportFile> {
    enrich(&mut records)?;
    let columns = header_union(&records);
    let path = dir.join(date.file_name());

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_csv(tmp.as_file_mut(), &columns, &records)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| ReportError::Io(e.error))?;

    info!(
        path = %path.display(),
        rows = records.len(),
        columns = columns.len(),
        "Report generated"
    );

    Ok(ReportFile {
        path,
        columns,
        rows: records.len(),
    })
}
