//! Input manager for loading files from disk

use crate::error::{FileReplaceError, Result};
use crate::input::file_detector::FileFormat;
use log::info;
use std::path::Path;
use tokio::fs;

/// A file handed to the tool: its name and raw bytes
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn format(&self) -> Option<FileFormat> {
        FileFormat::from_file_name(&self.name)
    }
}

#[derive(Debug, Default)]
pub struct InputManager {
    loaded_bytes: u64,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, path: &Path) -> Result<UploadedFile> {
        if !path.exists() {
            return Err(FileReplaceError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(FileReplaceError::InvalidInput(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                FileReplaceError::InvalidInput(format!("Path has no file name: {}", path.display()))
            })?;

        let bytes = fs::read(path).await?;
        info!("Loaded {} ({} bytes)", path.display(), bytes.len());
        self.loaded_bytes += bytes.len() as u64;

        Ok(UploadedFile::new(name, bytes))
    }

    pub async fn load_all(&mut self, paths: &[impl AsRef<Path>]) -> Result<Vec<UploadedFile>> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(self.load(path.as_ref()).await?);
        }
        Ok(files)
    }

    pub fn loaded_bytes(&self) -> u64 {
        self.loaded_bytes
    }
}
