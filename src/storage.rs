/// Delimited-text ingestion for course files.
pub mod reader;

pub use reader::{load, LoadError, LoadReport, SkipReason, SkippedLine};
