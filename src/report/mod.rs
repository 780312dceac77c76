mod csv_report;

pub use csv_report::{build_report, ReportFile};

#[cfg(test)]
pub use csv_report::render_cell;
