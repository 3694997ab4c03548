//! Error handling for the file replace tool

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileReplaceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("XPT error: {0}")]
    Xpt(String),

    #[error("Value of variable '{variable}' is {length} bytes after replacement but the field holds {width}")]
    XptValueTooLong {
        variable: String,
        length: usize,
        width: usize,
    },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, FileReplaceError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for FileReplaceError {
    fn from(err: anyhow::Error) -> Self {
        FileReplaceError::Server(err.to_string())
    }
}

impl From<lopdf::Error> for FileReplaceError {
    fn from(err: lopdf::Error) -> Self {
        FileReplaceError::Pdf(err.to_string())
    }
}

impl From<csv::Error> for FileReplaceError {
    fn from(err: csv::Error) -> Self {
        FileReplaceError::Csv(err.to_string())
    }
}

impl From<quick_xml::Error> for FileReplaceError {
    fn from(err: quick_xml::Error) -> Self {
        FileReplaceError::Xml(err.to_string())
    }
}
