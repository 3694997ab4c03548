//! File replace library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod web;

pub use config::Config;
pub use error::{FileReplaceError, Result};
