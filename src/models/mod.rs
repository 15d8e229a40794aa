pub mod args;
pub mod config;
pub mod error_stats;
pub mod result;
pub mod sample;
pub mod stats;
pub mod transaction;
pub mod user_type;
