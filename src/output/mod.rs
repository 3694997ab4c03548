//! Output module: archive bundling and replacement summaries

pub mod archive;
pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{FileSummary, ReplacementSummary};
