//! Input processing module
//! Handles format detection and loading of files to be rewritten

pub mod file_detector;
pub mod manager;

pub use file_detector::FileFormat;
pub use manager::{InputManager, UploadedFile};
