pub mod models;
pub mod core;

pub use crate::core::execute::{load_thread_groups, parse_csv_content, parse_csv_file};
pub use crate::models::config::ReportConfig;
pub use crate::models::result::AggregatedResult;
