//! Bundling of modified files into a single downloadable archive

use crate::error::{FileReplaceError, Result};
use crate::processing::FileOutcome;
use chrono::{Datelike, Timelike};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Container format of the bundle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    #[default]
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Format implied by an archive file name, if its extension names one
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Zip => "application/zip",
            Self::TarGz => "application/gzip",
        }
    }
}

/// Bundle every outcome that produced output; unsupported and failed files are left out
pub fn bundle(outcomes: &[FileOutcome], format: ArchiveFormat) -> Result<Vec<u8>> {
    let entries = named_outputs(outcomes);
    match format {
        ArchiveFormat::Zip => write_zip(&entries),
        ArchiveFormat::TarGz => {
            let mut buffer = Vec::new();
            write_tar_gz(&mut buffer, &entries)?;
            Ok(buffer)
        }
    }
}

fn write_zip(entries: &[(String, &[u8])]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644)
        .last_modified_time(zip_timestamp());

    for (entry_name, bytes) in entries {
        zip.start_file(entry_name.as_str(), options)
            .map_err(|e| FileReplaceError::Archive(format!("Failed to add {}: {}", entry_name, e)))?;
        zip.write_all(bytes)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| FileReplaceError::Archive(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn write_tar_gz<W: Write>(writer: W, entries: &[(String, &[u8])]) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);
    let mtime = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);

    for (entry_name, bytes) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, *bytes)
            .map_err(|e| FileReplaceError::Archive(format!("Failed to add {}: {}", entry_name, e)))?;
    }

    let enc = tar
        .into_inner()
        .map_err(|e| FileReplaceError::Archive(e.to_string()))?;
    enc.finish()
        .map_err(|e| FileReplaceError::Archive(e.to_string()))?;
    Ok(())
}

/// Zip entries carry local time without a zone
fn zip_timestamp() -> zip::DateTime {
    let now = chrono::Local::now();
    u16::try_from(now.year())
        .ok()
        .and_then(|year| {
            zip::DateTime::from_date_and_time(
                year,
                now.month() as u8,
                now.day() as u8,
                now.hour() as u8,
                now.minute() as u8,
                now.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

/// Write every produced file into `dir` under the same names the archive uses
pub fn write_directory(dir: &Path, outcomes: &[FileOutcome]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (entry_name, bytes) in named_outputs(outcomes) {
        let path = dir.join(entry_name);
        std::fs::write(&path, bytes)?;
        written.push(path);
    }
    Ok(written)
}

/// Pair each produced output with a sanitized name that is unique within the batch
fn named_outputs(outcomes: &[FileOutcome]) -> Vec<(String, &[u8])> {
    let mut used = HashSet::new();
    outcomes
        .iter()
        .filter_map(|outcome| {
            let bytes = outcome.bytes.as_deref()?;
            let name = unique_entry_name(&sanitize_file_name(&outcome.name), &mut used);
            Some((name, bytes))
        })
        .collect()
}

/// Read back every entry of an archive produced by [`bundle`]
pub fn read_entries(archive: &[u8], format: ArchiveFormat) -> Result<Vec<(String, Vec<u8>)>> {
    let mut entries = Vec::new();
    match format {
        ArchiveFormat::Zip => {
            let mut zip = ZipArchive::new(Cursor::new(archive))
                .map_err(|e| FileReplaceError::Archive(e.to_string()))?;
            for index in 0..zip.len() {
                let mut file = zip
                    .by_index(index)
                    .map_err(|e| FileReplaceError::Archive(e.to_string()))?;
                let name = file.name().to_string();
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                entries.push((name, bytes));
            }
        }
        ArchiveFormat::TarGz => {
            let mut tar = tar::Archive::new(GzDecoder::new(archive));
            for entry in tar.entries()? {
                let mut entry = entry?;
                let name = entry.path()?.to_string_lossy().to_string();
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes)?;
                entries.push((name, bytes));
            }
        }
    }
    Ok(entries)
}

/// Keep only the final path component of an uploaded name
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    match base {
        "" | "." | ".." => "file".to_string(),
        other => other.to_string(),
    }
}

fn unique_entry_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 1;
    loop {
        let candidate = format!("{} ({}){}", stem, n, extension);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
