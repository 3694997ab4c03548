//! Literal search-and-replace shared by every format handler

use crate::error::{FileReplaceError, Result};
use regex::{NoExpand, Regex, RegexBuilder};
use std::ops::Range;

/// A compiled search/replace pair.
///
/// Matching is literal: regex metacharacters in the search string are escaped
/// and the replacement is inserted verbatim (no `$1` expansion). Matches are
/// non-overlapping and scanned left to right.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Regex,
    find: String,
    replacement: String,
    case_sensitive: bool,
}

impl Matcher {
    pub fn new(find: &str, replacement: &str, case_sensitive: bool) -> Result<Self> {
        if find.is_empty() {
            return Err(FileReplaceError::InvalidInput(
                "Search string must not be empty".to_string(),
            ));
        }

        let pattern = RegexBuilder::new(&regex::escape(find))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| FileReplaceError::InvalidInput(format!("Invalid search string: {}", e)))?;

        Ok(Self {
            pattern,
            find: find.to_string(),
            replacement: replacement.to_string(),
            case_sensitive,
        })
    }

    pub fn find(&self) -> &str {
        &self.find
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn count(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }

    /// Match positions in `text`, as char offsets rather than byte offsets
    pub fn char_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut char_pos = 0;
        let mut last_byte = 0;
        for m in self.pattern.find_iter(text) {
            char_pos += text[last_byte..m.start()].chars().count();
            let len = m.as_str().chars().count();
            spans.push(char_pos..char_pos + len);
            char_pos += len;
            last_byte = m.end();
        }
        spans
    }

    /// Replace every match in `text`.
    ///
    /// Returns `None` when nothing matched so callers can keep the original node as is.
    pub fn replace(&self, text: &str) -> Option<(String, usize)> {
        let count = self.count(text);
        if count == 0 {
            return None;
        }
        let replaced = self
            .pattern
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned();
        Some((replaced, count))
    }
}
