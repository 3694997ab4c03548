//! Dispatches files to their format handler and collects per-file outcomes

use crate::config::Config;
use crate::error::Result;
use crate::input::{FileFormat, UploadedFile};
use crate::output::archive::{self, ArchiveFormat};
use crate::processing::csv_replacer::CsvReplacer;
use crate::processing::matcher::Matcher;
use crate::processing::pdf_replacer::PdfReplacer;
use crate::processing::replacer::Replacer;
use crate::processing::xml_replacer::XmlReplacer;
use crate::processing::xpt_replacer::XptReplacer;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Replaced { count: usize },
    Unsupported,
    Failed { error: String },
}

/// Result of processing one file. `bytes` holds the output for replaced files;
/// `warnings` lists text the handler found but left unchanged.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub name: String,
    pub format: Option<FileFormat>,
    pub status: FileStatus,
    pub bytes: Option<Vec<u8>>,
    pub warnings: Vec<String>,
}

impl FileOutcome {
    pub fn count(&self) -> usize {
        match self.status {
            FileStatus::Replaced { count } => count,
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub outcomes: Vec<FileOutcome>,
    pub archive: Vec<u8>,
    pub archive_format: ArchiveFormat,
}

impl BatchResult {
    pub fn total_replacements(&self) -> usize {
        self.outcomes.iter().map(FileOutcome::count).sum()
    }
}

pub struct ReplaceEngine {
    pdf: PdfReplacer,
    csv: CsvReplacer,
    xml: XmlReplacer,
    xpt: XptReplacer,
    archive_format: ArchiveFormat,
}

impl ReplaceEngine {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            pdf: PdfReplacer::new(config.pdf.compress_output),
            csv: CsvReplacer::from_config(&config.csv)?,
            xml: XmlReplacer::new(config.xml.replace_in_cdata),
            xpt: XptReplacer::new(),
            archive_format: config.output.archive_format,
        })
    }

    fn replacer_for(&self, format: FileFormat) -> &dyn Replacer {
        match format {
            FileFormat::Pdf => &self.pdf,
            FileFormat::Csv => &self.csv,
            FileFormat::Xml => &self.xml,
            FileFormat::Xpt => &self.xpt,
        }
    }

    /// Process one file. Unsupported formats and handler errors become outcomes, never errors.
    pub fn process_file(&self, file: &UploadedFile, matcher: &Matcher) -> FileOutcome {
        let Some(format) = file.format() else {
            warn!("Unsupported file type: {}", file.name);
            return FileOutcome {
                name: file.name.clone(),
                format: None,
                status: FileStatus::Unsupported,
                bytes: None,
                warnings: Vec::new(),
            };
        };

        match self.replacer_for(format).replace(&file.bytes, matcher) {
            Ok(replacement) => {
                info!("{}: {} replacements", file.name, replacement.count);
                for warning in &replacement.warnings {
                    warn!("{}: {}", file.name, warning);
                }
                FileOutcome {
                    name: file.name.clone(),
                    format: Some(format),
                    status: FileStatus::Replaced {
                        count: replacement.count,
                    },
                    bytes: Some(replacement.bytes),
                    warnings: replacement.warnings,
                }
            }
            Err(e) => {
                warn!("Error processing {}: {}", file.name, e);
                FileOutcome {
                    name: file.name.clone(),
                    format: Some(format),
                    status: FileStatus::Failed {
                        error: e.to_string(),
                    },
                    bytes: None,
                    warnings: Vec::new(),
                }
            }
        }
    }

    pub fn process_all(&self, files: &[UploadedFile], matcher: &Matcher) -> Vec<FileOutcome> {
        files
            .iter()
            .map(|file| self.process_file(file, matcher))
            .collect()
    }

    /// Process every file in order and bundle the successful outputs into one archive
    pub fn process_batch(&self, files: &[UploadedFile], matcher: &Matcher) -> Result<BatchResult> {
        let outcomes = self.process_all(files, matcher);
        let archive = archive::bundle(&outcomes, self.archive_format)?;
        Ok(BatchResult {
            outcomes,
            archive,
            archive_format: self.archive_format,
        })
    }
}

impl Default for ReplaceEngine {
    fn default() -> Self {
        Self {
            pdf: PdfReplacer::new(true),
            csv: CsvReplacer::default(),
            xml: XmlReplacer::default(),
            xpt: XptReplacer::new(),
            archive_format: ArchiveFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::pdf_replacer::tests::{page_text, simple_pdf};

    #[test]
    fn test_dispatch_by_extension() {
        let engine = ReplaceEngine::default();
        let matcher = Matcher::new("acme", "Globex", false).unwrap();
        let files = vec![
            UploadedFile::new("clients.CSV", b"name\nAcme\n".to_vec()),
            UploadedFile::new("feed.xml", b"<r>acme</r>".to_vec()),
            UploadedFile::new("letter.pdf", simple_pdf(&["Dear ACME"])),
        ];

        let outcomes = engine.process_all(&files, &matcher);

        assert_eq!(outcomes.iter().map(FileOutcome::count).collect::<Vec<_>>(), vec![1, 1, 1]);
        assert_eq!(outcomes[0].bytes.as_deref(), Some(&b"name\nGlobex\n"[..]));
        assert_eq!(outcomes[1].bytes.as_deref(), Some(&b"<r>Globex</r>"[..]));
        assert_eq!(page_text(outcomes[2].bytes.as_ref().unwrap()), "Dear Globex");
    }

    #[test]
    fn test_handler_warnings_reach_the_outcome() {
        let engine = ReplaceEngine::default();
        let matcher = Matcher::new("calm", "\u{5e73}\u{9759}", false).unwrap();
        let file = UploadedFile::new("note.pdf", simple_pdf(&["keep calm"]));

        let outcome = engine.process_file(&file, &matcher);

        assert_eq!(outcome.status, FileStatus::Replaced { count: 0 });
        assert_eq!(outcome.bytes.as_deref(), Some(file.bytes.as_slice()));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("cannot show the replacement text"));
    }

    #[test]
    fn test_unsupported_and_failed_do_not_abort() {
        let engine = ReplaceEngine::default();
        let matcher = Matcher::new("x", "y", false).unwrap();
        let files = vec![
            UploadedFile::new("notes.docx", b"x".to_vec()),
            UploadedFile::new("broken.xml", b"<a><b>x</a>".to_vec()),
            UploadedFile::new("ok.csv", b"h\nx\n".to_vec()),
        ];

        let batch = engine.process_batch(&files, &matcher).unwrap();

        assert_eq!(batch.outcomes[0].status, FileStatus::Unsupported);
        assert!(batch.outcomes[1].is_failure());
        assert_eq!(batch.outcomes[2].status, FileStatus::Replaced { count: 1 });
        assert_eq!(batch.total_replacements(), 1);
        assert!(!batch.archive.is_empty());
    }

    #[test]
    fn test_batch_uses_configured_archive_format() {
        let mut config = Config::default();
        config.output.archive_format = ArchiveFormat::TarGz;
        config.output.archive_name = "batch.tar.gz".to_string();
        let engine = ReplaceEngine::new(&config).unwrap();
        let matcher = Matcher::new("x", "y", false).unwrap();
        let files = vec![UploadedFile::new("ok.csv", b"h\nx\n".to_vec())];

        let batch = engine.process_batch(&files, &matcher).unwrap();

        assert_eq!(batch.archive_format, ArchiveFormat::TarGz);
        let entries = archive::read_entries(&batch.archive, ArchiveFormat::TarGz).unwrap();
        assert_eq!(entries, vec![("ok.csv".to_string(), b"h\ny\n".to_vec())]);
        assert_eq!(
            ReplaceEngine::default().process_batch(&files, &matcher).unwrap().archive_format,
            ArchiveFormat::Zip
        );
    }
}
