//! Text replacement engine
//! Shared matcher plus one handler per supported file format

pub mod csv_replacer;
pub mod encoding;
pub mod engine;
pub mod matcher;
pub mod pdf_replacer;
pub mod replacer;
pub mod xml_replacer;
pub mod xpt_replacer;

pub use engine::{BatchResult, FileOutcome, FileStatus, ReplaceEngine};
pub use matcher::Matcher;
pub use replacer::{Replacement, Replacer};
