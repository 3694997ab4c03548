//! CLI interface for the file replace tool

use crate::output::archive::ArchiveFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "file-replace")]
#[command(about = "Find and replace a word across PDF, CSV, XML and XPT files")]
#[command(long_about = "Apply a literal search-and-replace to PDF text, CSV cells, XML text nodes and SAS transport character values, then bundle the modified files into one archive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replace text in one or more files
    Replace {
        /// Files to process (PDF, CSV, XML, XPT)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Word to find
        #[arg(short, long)]
        find: String,

        /// Replacement text (empty deletes every match)
        #[arg(short, long, default_value = "")]
        replace: String,

        /// Match case, overriding replace.case_sensitive
        #[arg(short = 'C', long)]
        case_sensitive: bool,

        /// Ignore case, overriding replace.case_sensitive
        #[arg(short = 'i', long, conflicts_with = "case_sensitive")]
        ignore_case: bool,

        /// Archive to write (.zip or .tar.gz); defaults to the configured archive name
        #[arg(short, long)]
        archive: Option<PathBuf>,

        /// Also write every modified file into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Summary format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save the summary to a file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Count matches without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the upload form in a browser
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8501
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

/// Case sensitivity for a run: an explicit flag wins over the configured default
pub fn resolve_case_sensitivity(case_sensitive: bool, ignore_case: bool, configured: bool) -> bool {
    if case_sensitive {
        true
    } else if ignore_case {
        false
    } else {
        configured
    }
}

/// Archive format for `path`, taken from its extension when it names one
pub fn archive_format_for(path: &Path, configured: ArchiveFormat) -> ArchiveFormat {
    path.file_name()
        .and_then(|name| ArchiveFormat::from_file_name(&name.to_string_lossy()))
        .unwrap_or(configured)
}
