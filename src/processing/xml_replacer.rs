//! Replacement in XML character data

use crate::error::{FileReplaceError, Result};
use crate::processing::matcher::Matcher;
use crate::processing::replacer::{Replacement, Replacer};
use encoding_rs::Encoding;
use log::info;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

/// Streams the document and rewrites every text node, element text and tail
/// alike. Markup, attributes, comments and processing instructions are copied
/// through as read.
///
/// Text is decoded with the encoding named in the XML declaration and
/// rewritten text is encoded back to it, so a Latin-1 document stays Latin-1.
/// Characters the document encoding lacks are written as character references.
pub struct XmlReplacer {
    replace_in_cdata: bool,
}

impl XmlReplacer {
    pub fn new(replace_in_cdata: bool) -> Self {
        Self { replace_in_cdata }
    }
}

impl Default for XmlReplacer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Replacer for XmlReplacer {
    fn replace(&self, input: &[u8], matcher: &Matcher) -> Result<Replacement> {
        let mut reader = Reader::from_reader(input);
        let mut writer = Writer::new(Vec::with_capacity(input.len()));
        let mut buf = Vec::new();
        let mut count = 0;
        let mut saw_element = false;
        let mut depth = 0usize;

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                FileReplaceError::Xml(format!(
                    "Failed to parse XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;
            let encoding = reader.decoder().encoding();

            match event {
                Event::Eof => break,
                Event::Text(text) => {
                    let replaced = matcher.replace(&text.unescape()?);
                    match replaced {
                        Some((new_text, n)) => {
                            count += n;
                            let (bytes, _) = encode_text(&new_text, encoding);
                            writer.get_mut().extend_from_slice(&bytes);
                        }
                        None => writer.write_event(Event::Text(text))?,
                    }
                }
                Event::CData(cdata) if self.replace_in_cdata => {
                    let replaced = matcher.replace(&reader.decoder().decode(&cdata)?);
                    match replaced {
                        Some((new_text, n)) => {
                            count += n;
                            write_cdata(writer.get_mut(), &new_text, encoding);
                        }
                        None => writer.write_event(Event::CData(cdata))?,
                    }
                }
                other => {
                    match &other {
                        Event::Start(_) => {
                            saw_element = true;
                            depth += 1;
                        }
                        Event::Empty(_) => saw_element = true,
                        Event::End(_) => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                    writer.write_event(other)?;
                }
            }
            buf.clear();
        }

        if !saw_element {
            return Err(FileReplaceError::Xml(
                "Document has no root element".to_string(),
            ));
        }
        if depth > 0 {
            return Err(FileReplaceError::Xml(format!(
                "Unexpected end of document: {} element(s) left unclosed",
                depth
            )));
        }

        if count == 0 {
            return Ok(Replacement::unchanged(input));
        }

        info!("XML: {} replacements", count);
        Ok(Replacement::new(writer.into_inner(), count))
    }
}

/// Escape markup characters and encode to the document encoding.
/// The flag reports characters that had to become character references.
fn encode_text(text: &str, encoding: &'static Encoding) -> (Vec<u8>, bool) {
    let escaped = escape(text);
    let (bytes, _, had_errors) = encoding.encode(&escaped);
    (bytes.into_owned(), had_errors)
}

/// Character references mean nothing inside CDATA, and "]]>" would end the
/// section early; either case is written as escaped text instead.
fn write_cdata(out: &mut Vec<u8>, text: &str, encoding: &'static Encoding) {
    let (raw, _, had_errors) = encoding.encode(text);
    if had_errors || text.contains("]]>") {
        out.extend_from_slice(&encode_text(text, encoding).0);
    } else {
        out.extend_from_slice(b"<![CDATA[");
        out.extend_from_slice(&raw);
        out.extend_from_slice(b"]]>");
    }
}
