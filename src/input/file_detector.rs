//! File format detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    Pdf,
    Csv,
    Xml,
    Xpt,
}

impl FileFormat {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 4] = ["pdf", "csv", "xml", "xpt"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(FileFormat::Pdf),
            "csv" => Some(FileFormat::Csv),
            "xml" => Some(FileFormat::Xml),
            "xpt" => Some(FileFormat::Xpt),
            _ => None,
        }
    }

    /// Detect the format from the last extension of a file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Pdf => "pdf",
            FileFormat::Csv => "csv",
            FileFormat::Xml => "xml",
            FileFormat::Xpt => "xpt",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}
