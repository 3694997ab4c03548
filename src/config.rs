//! Configuration management for the file replace tool

use crate::error::{FileReplaceError, Result};
use crate::output::archive::ArchiveFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub replace: ReplaceConfig,
    pub csv: CsvConfig,
    pub xml: XmlConfig,
    pub pdf: PdfConfig,
    pub output: OutputConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceConfig {
    /// Default for the match-case toggle when the caller does not set it
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: char,
    pub has_headers: bool,
    pub replace_in_headers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlConfig {
    pub replace_in_cdata: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub compress_output: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub archive_format: ArchiveFormat,
    pub archive_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    pub max_upload_mb: usize,
    pub max_stored_results: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: true,
            replace_in_headers: false,
        }
    }
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            replace_in_cdata: true,
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            compress_output: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            archive_format: ArchiveFormat::Zip,
            archive_name: "modified_files.zip".to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            max_upload_mb: 200,
            max_stored_results: 16,
        }
    }
}

impl Config {
    /// Load the config at `config_path`, writing defaults there on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                FileReplaceError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            FileReplaceError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("file-replace")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if !self.csv.delimiter.is_ascii() {
            return Err(FileReplaceError::Configuration(format!(
                "csv.delimiter must be a single ASCII character, got '{}'",
                self.csv.delimiter
            )));
        }
        if self.output.archive_name.trim().is_empty() {
            return Err(FileReplaceError::Configuration(
                "output.archive_name must not be empty".to_string(),
            ));
        }
        if let Some(named) = ArchiveFormat::from_file_name(&self.output.archive_name) {
            if named != self.output.archive_format {
                return Err(FileReplaceError::Configuration(format!(
                    "output.archive_name '{}' does not match output.archive_format {:?}",
                    self.output.archive_name, self.output.archive_format
                )));
            }
        }
        if self.web.max_stored_results == 0 {
            return Err(FileReplaceError::Configuration(
                "web.max_stored_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Upload cap for the web front-end, in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.web.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
