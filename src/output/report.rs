//! Replacement summary shown after a batch

use crate::input::FileFormat;
use crate::processing::{FileOutcome, FileStatus, Matcher};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-file line of the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub name: String,
    pub format: Option<FileFormat>,
    #[serde(flatten)]
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl FileSummary {
    pub fn count(&self) -> usize {
        match self.status {
            FileStatus::Replaced { count } => count,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementSummary {
    pub generated_at: DateTime<Utc>,
    pub find: String,
    pub replace: String,
    pub case_sensitive: bool,
    pub files: Vec<FileSummary>,
    pub total_replacements: usize,
    /// Where the archive was written or can be downloaded, if anywhere
    pub archive: Option<String>,
    pub dry_run: bool,
}

impl ReplacementSummary {
    pub fn from_outcomes(matcher: &Matcher, outcomes: &[FileOutcome]) -> Self {
        let files: Vec<FileSummary> = outcomes
            .iter()
            .map(|outcome| FileSummary {
                name: outcome.name.clone(),
                format: outcome.format,
                status: outcome.status.clone(),
                warnings: outcome.warnings.clone(),
            })
            .collect();
        let total_replacements = files.iter().map(FileSummary::count).sum();

        Self {
            generated_at: Utc::now(),
            find: matcher.find().to_string(),
            replace: matcher.replacement().to_string(),
            case_sensitive: matcher.case_sensitive(),
            files,
            total_replacements,
            archive: None,
            dry_run: false,
        }
    }

    pub fn with_archive(mut self, location: impl Into<String>) -> Self {
        self.archive = Some(location.into());
        self
    }

    pub fn as_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn processed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Replaced { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed { .. }))
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warnings.len()).sum()
    }

    pub fn unsupported_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Unsupported))
            .count()
    }
}
