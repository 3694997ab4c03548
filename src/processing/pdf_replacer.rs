//! Text replacement inside PDF page content streams

use crate::error::{FileReplaceError, Result};
use crate::processing::matcher::Matcher;
use crate::processing::replacer::{Replacement, Replacer};
use log::{debug, info};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;

/// Rewrites the string operands of text-showing operators (`Tj`, `'`, `"`, `TJ`).
///
/// Strings are decoded with the encoding of the font selected by `Tf`: the
/// named base encodings, or the font's `/ToUnicode` map for composite fonts.
/// Text that cannot be decoded, or whose replacement the font cannot encode,
/// is left as is and reported as a warning on the replacement.
pub struct PdfReplacer {
    compress_output: bool,
}

impl PdfReplacer {
    pub fn new(compress_output: bool) -> Self {
        Self { compress_output }
    }
}

impl Replacer for PdfReplacer {
    fn replace(&self, input: &[u8], matcher: &Matcher) -> Result<Replacement> {
        let mut doc = Document::load_mem(input)
            .map_err(|e| FileReplaceError::Pdf(format!("Failed to parse PDF: {}", e)))?;

        let mut warnings = Vec::new();
        let mut total = 0;
        for (page_number, page_id) in doc.get_pages() {
            let Some((content, count)) =
                rewrite_page(&doc, page_number, page_id, matcher, &mut warnings)?
            else {
                continue;
            };
            doc.change_page_content(page_id, content)?;
            debug!("Page {}: {} replacements", page_number, count);
            total += count;
        }

        if total == 0 {
            return Ok(Replacement::unchanged(input).with_warnings(warnings));
        }

        if self.compress_output {
            doc.compress();
        }
        let mut bytes = Vec::with_capacity(input.len());
        doc.save_to(&mut bytes)
            .map_err(|e| FileReplaceError::Pdf(format!("Failed to write PDF: {}", e)))?;

        info!("PDF: {} replacements", total);
        Ok(Replacement::new(bytes, total).with_warnings(warnings))
    }
}

/// Outcome of matching one text run
#[derive(Debug, PartialEq, Eq)]
enum RunEdit {
    Unchanged,
    Replaced(usize),
    /// Matches were found but the font has no codes for the replacement text
    Unencodable(usize),
    Undecodable,
}

/// Encoding of a font resource, or why its strings cannot be read
type FontEncoding<'a> = std::result::Result<Encoding<'a>, String>;

/// Rewrite one page's content. Returns the new content and its replacement
/// count, or `None` when nothing on the page changed.
fn rewrite_page(
    doc: &Document,
    page_number: u32,
    page_id: ObjectId,
    matcher: &Matcher,
    warnings: &mut Vec<String>,
) -> Result<Option<(Vec<u8>, usize)>> {
    let page = doc.get_dictionary(page_id)?;
    if page.get(b"Contents").is_err() {
        debug!("Page {} has no content stream", page_number);
        return Ok(None);
    }

    let fonts: BTreeMap<Vec<u8>, FontEncoding> = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| (name, font_encoding(doc, font)))
        .collect();
    let mut content = Content::decode(&page_content(doc, page_id)?)?;

    let mut current_font: Option<Vec<u8>> = None;
    let mut saved_fonts: Vec<Option<Vec<u8>>> = Vec::new();
    let mut count = 0;
    let mut unencodable: BTreeMap<Vec<u8>, usize> = BTreeMap::new();

    for operation in content.operations.iter_mut() {
        let operand_index = match operation.operator.as_str() {
            "q" => {
                saved_fonts.push(current_font.clone());
                continue;
            }
            "Q" => {
                current_font = saved_fonts.pop().unwrap_or(None);
                continue;
            }
            "Tf" => {
                current_font = operation
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .map(|name| name.to_vec());
                continue;
            }
            "Tj" | "'" | "TJ" => 0,
            "\"" => 2,
            _ => continue,
        };
        let Some(operand) = operation.operands.get_mut(operand_index) else {
            continue;
        };

        let Some(font) = &current_font else {
            note(
                warnings,
                format!("Page {}: text shown before any font was selected was left unchanged", page_number),
            );
            continue;
        };
        let font_label = String::from_utf8_lossy(font);
        let encoding = match fonts.get(font) {
            Some(Ok(encoding)) => encoding,
            Some(Err(reason)) => {
                note(
                    warnings,
                    format!("Page {}: text in font /{} was left unchanged ({})", page_number, font_label, reason),
                );
                continue;
            }
            None => {
                note(
                    warnings,
                    format!(
                        "Page {}: font /{} is missing from the page resources; its text was left unchanged",
                        page_number, font_label
                    ),
                );
                continue;
            }
        };

        let edit = match operand {
            Object::Array(items) => replace_in_runs(items, encoding, matcher),
            Object::String(..) => {
                let mut items = vec![operand.clone()];
                let edit = replace_in_runs(&mut items, encoding, matcher);
                if let (RunEdit::Replaced(_), Some(item)) = (&edit, items.pop()) {
                    *operand = item;
                }
                edit
            }
            _ => RunEdit::Unchanged,
        };

        match edit {
            RunEdit::Unchanged => {}
            RunEdit::Replaced(n) => count += n,
            RunEdit::Unencodable(n) => *unencodable.entry(font.clone()).or_default() += n,
            RunEdit::Undecodable => note(
                warnings,
                format!(
                    "Page {}: text in font /{} could not be decoded and was left unchanged",
                    page_number, font_label
                ),
            ),
        }
    }

    for (font, n) in unencodable {
        note(
            warnings,
            format!(
                "Page {}: {} match(es) left unchanged because font /{} cannot show the replacement text",
                page_number,
                n,
                String::from_utf8_lossy(&font)
            ),
        );
    }

    if count == 0 {
        return Ok(None);
    }
    Ok(Some((content.encode()?, count)))
}

/// Replace inside a sequence of `TJ` elements (a lone `Tj` string is a one-element run).
///
/// Matching runs over the concatenated text, so a word split by a kerning
/// adjustment is still found. Replacement text lands in the element where the
/// match starts; the rest of the matched characters and any adjustments inside
/// the match are dropped. Adjustments outside matches are kept, and elements
/// without matched characters keep their original bytes.
fn replace_in_runs(items: &mut Vec<Object>, encoding: &Encoding, matcher: &Matcher) -> RunEdit {
    let mut pieces = Vec::new();
    for item in items.iter() {
        if let Object::String(bytes, _) = item {
            match Document::decode_text(encoding, bytes) {
                Ok(text) => pieces.push(text),
                Err(_) => return RunEdit::Undecodable,
            }
        }
    }

    let text = pieces.concat();
    let spans = matcher.char_spans(&text);
    if spans.is_empty() {
        return RunEdit::Unchanged;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut starts = vec![false; chars.len()];
    let mut covered = vec![false; chars.len()];
    for span in &spans {
        starts[span.start] = true;
        for flag in &mut covered[span.clone()] {
            *flag = true;
        }
    }

    let mut pieces = pieces.into_iter();
    let mut rewritten = Vec::with_capacity(items.len());
    let mut pos = 0;
    for item in items.iter() {
        match item {
            Object::String(bytes, format) => {
                let piece = pieces.next().unwrap_or_default();
                let range = pos..pos + piece.chars().count();
                pos = range.end;

                if !covered[range.clone()].contains(&true) {
                    rewritten.push(item.clone());
                    continue;
                }
                // Codes that do not survive a decode/encode trip would be lost on rewrite
                if Document::encode_text(encoding, &piece) != *bytes {
                    return RunEdit::Undecodable;
                }

                let mut out = String::with_capacity(piece.len());
                for idx in range {
                    if starts[idx] {
                        out.push_str(matcher.replacement());
                    }
                    if !covered[idx] {
                        out.push(chars[idx]);
                    }
                }
                let encoded = Document::encode_text(encoding, &out);
                match Document::decode_text(encoding, &encoded) {
                    Ok(decoded) if decoded == out => rewritten.push(Object::String(encoded, *format)),
                    _ => return RunEdit::Unencodable(spans.len()),
                }
            }
            adjustment => {
                let inside_match =
                    pos > 0 && pos < chars.len() && covered[pos - 1] && covered[pos] && !starts[pos];
                if !inside_match {
                    rewritten.push(adjustment.clone());
                }
            }
        }
    }
    *items = rewritten;

    RunEdit::Replaced(spans.len())
}

/// The encoding used to read and write strings shown with `font`.
///
/// Simple fonts without an `/Encoding` entry are read as WinAnsi, which is
/// what producers of unembedded standard fonts write in practice.
fn font_encoding<'a>(doc: &'a Document, font: &'a Dictionary) -> FontEncoding<'a> {
    let named = font.get(b"Encoding").and_then(Object::as_name).is_ok();
    if named || font.has(b"ToUnicode") {
        return font
            .get_font_encoding(doc)
            .map_err(|e| format!("unreadable font encoding: {}", e));
    }
    if font.has(b"Encoding") {
        return Err("custom /Encoding without a /ToUnicode map".to_string());
    }
    Ok(Encoding::SimpleEncoding(b"WinAnsiEncoding"))
}

/// Concatenated content streams of a page. Stream boundaries separate tokens.
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    for stream_id in doc.get_page_contents(page_id) {
        let stream = doc.get_object(stream_id)?.as_stream()?;
        match stream.decompressed_content() {
            Ok(data) => content.extend_from_slice(&data),
            Err(_) => content.extend_from_slice(&stream.content),
        }
        content.push(b'\n');
    }
    Ok(content)
}

fn note(warnings: &mut Vec<String>, message: String) {
    if !warnings.contains(&message) {
        warnings.push(message);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::Operation;
    use lopdf::{dictionary, Stream, StringFormat};

    const IDENTITY_TO_UNICODE: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CMapName /Test-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0020> <007E> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

    pub(crate) fn helvetica(doc: &mut Document) -> Object {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        })
        .into()
    }

    /// Composite font with two-byte identity codes, optionally carrying a `/ToUnicode` map
    fn identity_font(doc: &mut Document, to_unicode: bool) -> Object {
        let mut font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "NotoSans",
            "Encoding" => "Identity-H",
        };
        if to_unicode {
            let cmap_id = doc.add_object(Stream::new(dictionary! {}, IDENTITY_TO_UNICODE.as_bytes().to_vec()));
            font.set("ToUnicode", cmap_id);
        }
        doc.add_object(font).into()
    }

    fn two_byte_codes(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_be_bytes).collect()
    }

    fn text_object(font: &str, operations: Vec<Operation>) -> Vec<Operation> {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
        ];
        ops.extend(operations);
        ops.push(Operation::new("ET", vec![]));
        ops
    }

    /// Build a one-page PDF. Fonts live in a resource dictionary inherited
    /// from the page tree node; each entry of `streams` becomes its own
    /// content stream.
    pub(crate) fn build_document(
        fonts: impl FnOnce(&mut Document) -> Dictionary,
        streams: Vec<Vec<Operation>>,
    ) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_dict = fonts(&mut doc);
        let resources_id = doc.add_object(dictionary! {
            "Font" => font_dict,
        });

        let stream_ids: Vec<Object> = streams
            .into_iter()
            .map(|operations| {
                let content = Content { operations };
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
                    .into()
            })
            .collect();
        let contents = match stream_ids.as_slice() {
            [single] => single.clone(),
            _ => Object::Array(stream_ids),
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// One-page PDF whose content stream runs `operations` with Helvetica as F1
    pub(crate) fn build_pdf(operations: Vec<Operation>) -> Vec<u8> {
        build_document(
            |doc| dictionary! { "F1" => helvetica(doc) },
            vec![text_object("F1", operations)],
        )
    }

    pub(crate) fn simple_pdf(lines: &[&str]) -> Vec<u8> {
        let ops = lines
            .iter()
            .flat_map(|line| {
                vec![
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("T*", vec![]),
                ]
            })
            .collect();
        build_pdf(ops)
    }

    fn literal(bytes: &[u8]) -> Object {
        Object::String(bytes.to_vec(), StringFormat::Literal)
    }

    fn page_operations(bytes: &[u8]) -> Vec<Operation> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        Content::decode(&doc.get_page_content(page_id).unwrap())
            .unwrap()
            .operations
    }

    /// Raw bytes of every string operand on page 1, in order
    fn page_strings(bytes: &[u8]) -> Vec<Vec<u8>> {
        let mut strings = Vec::new();
        for op in page_operations(bytes) {
            for operand in op.operands {
                match operand {
                    Object::String(bytes, _) => strings.push(bytes),
                    Object::Array(items) => {
                        for item in items {
                            if let Object::String(bytes, _) = item {
                                strings.push(bytes);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        strings
    }

    /// All string operands of page 1 read as WinAnsi, concatenated
    pub(crate) fn page_text(bytes: &[u8]) -> String {
        let encoding = Encoding::SimpleEncoding(b"WinAnsiEncoding");
        page_strings(bytes)
            .iter()
            .map(|s| Document::decode_text(&encoding, s).unwrap())
            .collect()
    }

    #[test]
    fn test_replaces_tj_strings() {
        let input = simple_pdf(&["Hello World!", "Hello again, hello."]);
        let matcher = Matcher::new("hello", "Hi", false).unwrap();

        let result = PdfReplacer::new(true).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 3);
        assert!(result.warnings.is_empty());
        let text = page_text(&result.bytes);
        assert_eq!(text, "Hi World!Hi again, Hi.");
        assert_eq!(matcher.count(&text), 0);
    }

    #[test]
    fn test_case_sensitive_leaves_other_cases() {
        let input = simple_pdf(&["Hello hello HELLO"]);
        let matcher = Matcher::new("hello", "bye", true).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(page_text(&result.bytes), "Hello bye HELLO");
    }

    #[test]
    fn test_match_split_by_kerning() {
        let input = build_pdf(vec![Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("Hel"),
                Object::Integer(-20),
                Object::string_literal("lo"),
                Object::Integer(-250),
                Object::string_literal("World"),
            ])],
        )]);
        let matcher = Matcher::new("Hello", "Hi", true).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(page_text(&result.bytes), "HiWorld");

        let ops = page_operations(&result.bytes);
        let tj = ops.iter().find(|op| op.operator == "TJ").unwrap();
        let items = tj.operands[0].as_array().unwrap();
        assert!(items.iter().any(|o| matches!(o, Object::Integer(-250))));
        assert!(!items.iter().any(|o| matches!(o, Object::Integer(-20))));
    }

    #[test]
    fn test_no_match_is_byte_identical() {
        let input = simple_pdf(&["Nothing to change here"]);
        let matcher = Matcher::new("absent", "present", false).unwrap();

        let result = PdfReplacer::new(true).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 0);
        assert_eq!(result.bytes, input);
    }

    #[test]
    fn test_win_ansi_punctuation_is_matched() {
        let input = build_pdf(vec![
            Operation::new("Tj", vec![literal(b"don\x92t panic")]),
            Operation::new("Tj", vec![literal(b"price \x80 5")]),
        ]);

        let matcher = Matcher::new("don\u{2019}t", "do not", true).unwrap();
        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(page_text(&result.bytes), "do not panicprice \u{20ac} 5");

        let matcher = Matcher::new("\u{20ac}", "EUR", true).unwrap();
        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(page_strings(&result.bytes)[1], b"price EUR 5");
    }

    #[test]
    fn test_replacement_written_in_font_encoding() {
        let input = build_pdf(vec![Operation::new("Tj", vec![literal(b"don\x92t panic")])]);
        let matcher = Matcher::new("panic", "\u{2019}", true).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(page_strings(&result.bytes), vec![b"don\x92t \x92".to_vec()]);
    }

    #[test]
    fn test_unencodable_replacement_is_reported() {
        let input = simple_pdf(&["keep calm and panic"]);
        let matcher = Matcher::new("panic", "\u{6050}\u{614c}", true).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 0);
        assert_eq!(result.bytes, input);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("cannot show the replacement text"));
        assert!(result.warnings[0].contains("/F1"));
    }

    #[test]
    fn test_composite_font_with_to_unicode_is_replaced() {
        let input = build_document(
            |doc| dictionary! { "F2" => identity_font(doc, true) },
            vec![text_object(
                "F2",
                vec![Operation::new(
                    "Tj",
                    vec![Object::String(two_byte_codes("Hello World"), StringFormat::Hexadecimal)],
                )],
            )],
        );
        let matcher = Matcher::new("hello", "Hi", false).unwrap();

        let result = PdfReplacer::new(true).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 1);
        assert!(result.warnings.is_empty());
        assert_eq!(page_strings(&result.bytes), vec![two_byte_codes("Hi World")]);
    }

    #[test]
    fn test_composite_font_without_to_unicode_is_reported() {
        let input = build_document(
            |doc| dictionary! { "F2" => identity_font(doc, false) },
            vec![text_object(
                "F2",
                vec![Operation::new(
                    "Tj",
                    vec![Object::String(two_byte_codes("Hello"), StringFormat::Hexadecimal)],
                )],
            )],
        );
        let matcher = Matcher::new("Hello", "Hi", false).unwrap();

        let result = PdfReplacer::new(true).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 0);
        assert_eq!(result.bytes, input);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Page 1: text in font /F2 was left unchanged"));
    }

    #[test]
    fn test_quote_operators() {
        let input = build_pdf(vec![
            Operation::new("'", vec![Object::string_literal("Hello there")]),
            Operation::new(
                "\"",
                vec![Object::Integer(2), Object::Integer(1), Object::string_literal("hello again")],
            ),
        ]);
        let matcher = Matcher::new("hello", "Hi", false).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(page_text(&result.bytes), "Hi thereHi again");
        let ops = page_operations(&result.bytes);
        let spaced = ops.iter().find(|op| op.operator == "\"").unwrap();
        assert_eq!(spaced.operands[0], Object::Integer(2));
        assert_eq!(spaced.operands[1], Object::Integer(1));
    }

    #[test]
    fn test_font_restored_after_graphics_state_pop() {
        let input = build_document(
            |doc| {
                dictionary! {
                    "F1" => helvetica(doc),
                    "F2" => identity_font(doc, false),
                }
            },
            vec![vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("ET", vec![]),
                Operation::new("q", vec![]),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F2".into(), 12.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(two_byte_codes("Hello"), StringFormat::Hexadecimal)],
                ),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
                Operation::new("BT", vec![]),
                Operation::new("Tj", vec![Object::string_literal("Hello")]),
                Operation::new("ET", vec![]),
            ]],
        );
        let matcher = Matcher::new("Hello", "Hi", true).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("/F2"));
        assert_eq!(page_strings(&result.bytes), vec![two_byte_codes("Hello"), b"Hi".to_vec()]);
    }

    #[test]
    fn test_contents_array_of_streams() {
        let input = build_document(
            |doc| dictionary! { "F1" => helvetica(doc) },
            vec![
                text_object("F1", vec![Operation::new("Tj", vec![Object::string_literal("Hello")])]),
                text_object("F1", vec![Operation::new("Tj", vec![Object::string_literal("hello again")])]),
            ],
        );
        let matcher = Matcher::new("hello", "Hi", false).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(page_text(&result.bytes), "HiHi again");
        let doc = Document::load_mem(&result.bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        assert_eq!(doc.get_page_contents(page_id).len(), 1);
    }

    #[test]
    fn test_text_before_font_selection_is_reported() {
        let input = build_document(
            |doc| dictionary! { "F1" => helvetica(doc) },
            vec![vec![
                Operation::new("BT", vec![]),
                Operation::new("Tj", vec![Object::string_literal("Hello")]),
                Operation::new("ET", vec![]),
            ]],
        );
        let matcher = Matcher::new("Hello", "Hi", false).unwrap();

        let result = PdfReplacer::new(false).replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 0);
        assert_eq!(
            result.warnings,
            vec!["Page 1: text shown before any font was selected was left unchanged".to_string()]
        );
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let matcher = Matcher::new("a", "b", false).unwrap();
        let err = PdfReplacer::new(true)
            .replace(b"this is not a pdf", &matcher)
            .unwrap_err();
        assert!(matches!(err, FileReplaceError::Pdf(_)));
    }
}
