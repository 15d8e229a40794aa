pub mod concurrency;
pub mod csv_tokenizer;
pub mod environment;
pub mod error_classifier;
pub mod execute;
pub mod jmx;
pub mod reconstruction;
pub mod sample_parser;
pub mod show_result_with_table;
pub mod statistics;
