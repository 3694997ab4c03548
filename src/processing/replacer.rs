//! Common interface of the per-format handlers

use crate::error::Result;
use crate::processing::matcher::Matcher;

/// Modified file contents and the number of substitutions made.
///
/// `warnings` lists text the handler found but could not safely rewrite, so
/// the user can see why a count is lower than expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub bytes: Vec<u8>,
    pub count: usize,
    pub warnings: Vec<String>,
}

impl Replacement {
    pub fn new(bytes: Vec<u8>, count: usize) -> Self {
        Self {
            bytes,
            count,
            warnings: Vec::new(),
        }
    }

    /// The input passed through untouched
    pub fn unchanged(input: &[u8]) -> Self {
        Self::new(input.to_vec(), 0)
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

pub trait Replacer {
    /// Apply `matcher` to every replaceable text node of `input`.
    ///
    /// Implementations return the input byte-for-byte when nothing matched.
    fn replace(&self, input: &[u8], matcher: &Matcher) -> Result<Replacement>;
}
