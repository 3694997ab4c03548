//! Cell-level replacement for CSV files

use crate::error::{FileReplaceError, Result};
use crate::processing::matcher::Matcher;
use crate::processing::replacer::{Replacement, Replacer};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::info;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct CsvReplacer {
    delimiter: u8,
    has_headers: bool,
    replace_in_headers: bool,
}

impl CsvReplacer {
    pub fn new(delimiter: u8, has_headers: bool, replace_in_headers: bool) -> Self {
        Self {
            delimiter,
            has_headers,
            replace_in_headers,
        }
    }

    pub fn from_config(config: &crate::config::CsvConfig) -> Result<Self> {
        let delimiter = u8::try_from(u32::from(config.delimiter))
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                FileReplaceError::Configuration(format!(
                    "CSV delimiter '{}' is not a single ASCII character",
                    config.delimiter
                ))
            })?;
        Ok(Self::new(delimiter, config.has_headers, config.replace_in_headers))
    }
}

impl Default for CsvReplacer {
    fn default() -> Self {
        Self::new(b',', true, false)
    }
}

impl Replacer for CsvReplacer {
    fn replace(&self, input: &[u8], matcher: &Matcher) -> Result<Replacement> {
        let (bom, body) = match input.strip_prefix(UTF8_BOM) {
            Some(rest) => (UTF8_BOM, rest),
            None => (&[][..], input),
        };
        let terminator = if body.windows(2).any(|w| w == b"\r\n") {
            Terminator::CRLF
        } else {
            Terminator::Any(b'\n')
        };

        // Headers are read as an ordinary record so they can be copied through verbatim.
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(body);

        let mut records: Vec<StringRecord> = Vec::new();
        let mut count = 0;
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let is_header = index == 0 && self.has_headers;
            if is_header && !self.replace_in_headers {
                records.push(record);
                continue;
            }

            let mut fields: Vec<String> = Vec::with_capacity(record.len());
            for field in record.iter() {
                match matcher.replace(field) {
                    Some((replaced, n)) => {
                        count += n;
                        fields.push(replaced);
                    }
                    None => fields.push(field.to_string()),
                }
            }
            records.push(StringRecord::from(fields));
        }

        if count == 0 {
            return Ok(Replacement::unchanged(input));
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(terminator)
            .flexible(true)
            .from_writer(bom.to_vec());
        for record in &records {
            writer.write_record(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| FileReplaceError::Csv(format!("Failed to flush CSV output: {}", e)))?;

        info!("CSV: {} replacements across {} records", count, records.len());
        Ok(Replacement::new(bytes, count))
    }
}
