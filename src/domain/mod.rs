mod link;
mod record;
mod report_date;

pub use link::console_link;
pub use record::{
    ChangeRecord, CAPTURE_TIME_FIELD, LINK_FIELD, REGION_FIELD, RESOURCE_ID_FIELD,
    RESOURCE_TYPE_FIELD,
};
pub use report_date::ReportDate;
