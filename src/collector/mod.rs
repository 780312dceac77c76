mod aws;
mod collector;
mod search;

pub use aws::AwsConfigSearch;
pub use collector::collect_changes;
pub use search::{ConfigSearch, SearchPage};
