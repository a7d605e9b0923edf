//! hashsplit: CLI y utilidades de E/S sobre `hashsplit-core`.
pub mod config;
pub mod dataset;
pub mod errors;

pub use config::AppConfig;
pub use dataset::{read_jsonl, read_samples, split_files, write_jsonl, write_split, JsonSample};
pub use errors::AppError;
