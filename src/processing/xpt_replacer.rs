//! Replacement in character variables of SAS transport (XPORT v5) files
//!
//! A transport file is a sequence of 80-byte records: a library header, then
//! for each member (dataset) a member header, a descriptor header, the
//! variable descriptors ("namestrs") and an observation header followed by
//! fixed-width observations packed back to back. Only character values inside
//! observations are rewritten; every header byte is kept as is.

use crate::error::{FileReplaceError, Result};
use crate::processing::encoding::{decode_single_byte, encode_single_byte};
use crate::processing::matcher::Matcher;
use crate::processing::replacer::{Replacement, Replacer};
use log::{debug, info};

const RECORD_LEN: usize = 80;
const LIBRARY_HEADER: &[u8] = b"HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!";
const LIBRARY_V8_HEADER: &[u8] = b"HEADER RECORD*******LIBV8   HEADER RECORD!!!!!!!";
const MEMBER_HEADER: &[u8] = b"HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!";
const DESCRIPTOR_HEADER: &[u8] = b"HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!";
const NAMESTR_HEADER: &[u8] = b"HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!";
const OBS_HEADER: &[u8] = b"HEADER RECORD*******OBS     HEADER RECORD!!!!!!!";

const CHARACTER_TYPE: i16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Variable {
    name: String,
    is_character: bool,
    width: usize,
    position: usize,
}

#[derive(Debug)]
struct Member {
    name: String,
    variables: Vec<Variable>,
    observation_len: usize,
    data_start: usize,
    data_end: usize,
}

pub struct XptReplacer;

impl XptReplacer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XptReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Replacer for XptReplacer {
    fn replace(&self, input: &[u8], matcher: &Matcher) -> Result<Replacement> {
        let members = parse_members(input)?;
        let mut output = input.to_vec();
        let mut count = 0;

        for member in &members {
            let replaced = replace_in_member(&mut output, member, matcher)?;
            debug!("XPT member {}: {} replacements", member.name, replaced);
            count += replaced;
        }

        if count == 0 {
            return Ok(Replacement::unchanged(input));
        }

        info!("XPT: {} replacements across {} members", count, members.len());
        Ok(Replacement::new(output, count))
    }
}

fn replace_in_member(output: &mut [u8], member: &Member, matcher: &Matcher) -> Result<usize> {
    if member.observation_len == 0 {
        return Ok(0);
    }

    let mut count = 0;
    let mut offset = member.data_start;
    while offset + member.observation_len <= member.data_end {
        // The last record is blank-padded to 80 bytes; that padding is not an observation.
        let remaining = &output[offset..member.data_end];
        if remaining.len() < RECORD_LEN && remaining.iter().all(|&b| b == b' ') {
            break;
        }

        for variable in member.variables.iter().filter(|v| v.is_character) {
            let start = offset + variable.position;
            let field = &mut output[start..start + variable.width];
            count += replace_in_field(field, variable, matcher)?;
        }
        offset += member.observation_len;
    }
    Ok(count)
}

fn replace_in_field(field: &mut [u8], variable: &Variable, matcher: &Matcher) -> Result<usize> {
    let value_len = field
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |last| last + 1);
    let value = decode_single_byte(&field[..value_len]);

    let Some((new_value, n)) = matcher.replace(&value) else {
        return Ok(0);
    };
    let encoded = encode_single_byte(&new_value)?;
    if encoded.len() > field.len() {
        return Err(FileReplaceError::XptValueTooLong {
            variable: variable.name.clone(),
            length: encoded.len(),
            width: field.len(),
        });
    }

    field[..encoded.len()].copy_from_slice(&encoded);
    field[encoded.len()..].fill(b' ');
    Ok(n)
}

fn parse_members(input: &[u8]) -> Result<Vec<Member>> {
    let first = record(input, 0)?;
    if first.starts_with(LIBRARY_V8_HEADER) {
        return Err(FileReplaceError::Xpt(
            "SAS transport version 8 files are not supported".to_string(),
        ));
    }
    if !first.starts_with(LIBRARY_HEADER) {
        return Err(FileReplaceError::Xpt(
            "Missing library header record; not a SAS transport file".to_string(),
        ));
    }

    let mut members = Vec::new();
    // Library header plus two real header records
    let mut pos = 3 * RECORD_LEN;
    while pos < input.len() {
        let member = parse_member(input, pos)?;
        pos = member.data_end;
        members.push(member);
    }

    if members.is_empty() {
        return Err(FileReplaceError::Xpt("File contains no members".to_string()));
    }
    Ok(members)
}

fn parse_member(input: &[u8], start: usize) -> Result<Member> {
    let header = expect_record(input, start, MEMBER_HEADER, "member header")?;
    let namestr_len = parse_digits(&header[74..78], "namestr length")?;
    if namestr_len != 140 && namestr_len != 136 {
        return Err(FileReplaceError::Xpt(format!(
            "Unexpected namestr length {}",
            namestr_len
        )));
    }

    let descriptor_pos = start + RECORD_LEN;
    expect_record(input, descriptor_pos, DESCRIPTOR_HEADER, "descriptor header")?;
    let member_data = record(input, descriptor_pos + RECORD_LEN)?;
    let name = String::from_utf8_lossy(&member_data[8..16]).trim_end().to_string();

    let namestr_header_pos = descriptor_pos + 3 * RECORD_LEN;
    let namestr_header = expect_record(input, namestr_header_pos, NAMESTR_HEADER, "namestr header")?;
    let variable_count = parse_digits(&namestr_header[54..58], "variable count")?;

    let namestrs_start = namestr_header_pos + RECORD_LEN;
    let namestrs_end = namestrs_start + variable_count * namestr_len;
    if namestrs_end > input.len() {
        return Err(FileReplaceError::Xpt(format!(
            "Truncated variable descriptors in member {}",
            name
        )));
    }
    let variables = (0..variable_count)
        .map(|i| parse_namestr(&input[namestrs_start + i * namestr_len..][..namestr_len]))
        .collect::<Vec<_>>();

    let obs_header_pos = round_up(namestrs_end);
    expect_record(input, obs_header_pos, OBS_HEADER, "observation header")?;
    let data_start = obs_header_pos + RECORD_LEN;
    let data_end = next_member_start(input, data_start).unwrap_or(input.len());

    let observation_len = variables
        .iter()
        .map(|v| v.position + v.width)
        .max()
        .unwrap_or(0);

    Ok(Member {
        name,
        variables,
        observation_len,
        data_start,
        data_end,
    })
}

fn parse_namestr(bytes: &[u8]) -> Variable {
    let ntype = i16::from_be_bytes([bytes[0], bytes[1]]);
    let nlng = i16::from_be_bytes([bytes[4], bytes[5]]);
    let npos = i32::from_be_bytes([bytes[84], bytes[85], bytes[86], bytes[87]]);
    Variable {
        name: String::from_utf8_lossy(&bytes[8..16]).trim_end().to_string(),
        is_character: ntype == CHARACTER_TYPE,
        width: usize::try_from(nlng).unwrap_or(0),
        position: usize::try_from(npos).unwrap_or(0),
    }
}

fn next_member_start(input: &[u8], from: usize) -> Option<usize> {
    (from..input.len())
        .step_by(RECORD_LEN)
        .find(|&pos| input[pos..].starts_with(MEMBER_HEADER))
}

fn record(input: &[u8], pos: usize) -> Result<&[u8]> {
    input.get(pos..pos + RECORD_LEN).ok_or_else(|| {
        FileReplaceError::Xpt(format!("Truncated file: expected a record at byte {}", pos))
    })
}

fn expect_record<'a>(input: &'a [u8], pos: usize, prefix: &[u8], what: &str) -> Result<&'a [u8]> {
    let rec = record(input, pos)?;
    if !rec.starts_with(prefix) {
        return Err(FileReplaceError::Xpt(format!("Expected {} at byte {}", what, pos)));
    }
    Ok(rec)
}

fn parse_digits(bytes: &[u8], what: &str) -> Result<usize> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| FileReplaceError::Xpt(format!("Malformed {} in header", what)))
}

fn round_up(pos: usize) -> usize {
    pos.div_ceil(RECORD_LEN) * RECORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Cell<'a> {
        Num,
        Char(&'a str),
    }

    fn pad(text: &str, len: usize) -> Vec<u8> {
        let mut out = text.as_bytes().to_vec();
        out.resize(len, b' ');
        out
    }

    fn header(kind: &[u8], tail: &str) -> Vec<u8> {
        let mut rec = kind.to_vec();
        rec.extend_from_slice(tail.as_bytes());
        rec.resize(RECORD_LEN, b' ');
        rec
    }

    fn pad_records(out: &mut Vec<u8>) {
        let len = round_up(out.len());
        out.resize(len, b' ');
    }

    /// Minimal XPORT v5 writer: `vars` are (name, is_character, width)
    fn build_member(out: &mut Vec<u8>, name: &str, vars: &[(&str, bool, usize)], rows: &[Vec<Cell>]) {
        out.extend(header(MEMBER_HEADER, "000000000000000001600000000140"));
        out.extend(header(DESCRIPTOR_HEADER, "000000000000000000000000000000"));
        let mut data1 = pad("SAS", 8);
        data1.extend(pad(name, 8));
        data1.resize(RECORD_LEN, b' ');
        out.extend(data1);
        out.extend(pad("", RECORD_LEN));
        out.extend(header(
            NAMESTR_HEADER,
            &format!("000000{:04}00000000000000000000", vars.len()),
        ));

        let mut position = 0i32;
        for (i, (var_name, is_char, width)) in vars.iter().enumerate() {
            let mut ns = Vec::with_capacity(140);
            ns.extend((if *is_char { 2i16 } else { 1i16 }).to_be_bytes());
            ns.extend(0i16.to_be_bytes());
            ns.extend((*width as i16).to_be_bytes());
            ns.extend((i as i16 + 1).to_be_bytes());
            ns.extend(pad(var_name, 8));
            ns.extend(pad("", 40));
            ns.extend(pad("", 8));
            ns.extend([0u8; 8]);
            ns.extend(pad("", 8));
            ns.extend([0u8; 4]);
            ns.extend(position.to_be_bytes());
            ns.extend([0u8; 52]);
            assert_eq!(ns.len(), 140);
            out.extend(ns);
            position += *width as i32;
        }
        pad_records(out);

        out.extend(header(OBS_HEADER, "000000000000000000000000000000"));
        for row in rows {
            for ((_, _, width), cell) in vars.iter().zip(row) {
                match cell {
                    Cell::Num => out.extend([0x41u8, 0x10, 0, 0, 0, 0, 0, 0][..*width].to_vec()),
                    Cell::Char(s) => out.extend(pad(s, *width)),
                }
            }
        }
        pad_records(out);
    }

    fn library() -> Vec<u8> {
        let mut out = header(LIBRARY_HEADER, "000000000000000000000000000000");
        out.extend(pad("SAS     SAS     SASLIB  9.4", RECORD_LEN));
        out.extend(pad("01JAN26:00:00:00", RECORD_LEN));
        out
    }

    fn sample() -> Vec<u8> {
        let mut out = library();
        build_member(
            &mut out,
            "DM",
            &[("USUBJID", true, 12), ("AGE", false, 8), ("SITE", true, 10)],
            &[
                vec![Cell::Char("ACME-001"), Cell::Num, Cell::Char("acme lab")],
                vec![Cell::Char("ACME-002"), Cell::Num, Cell::Char("Boston")],
            ],
        );
        out
    }

    fn char_values(bytes: &[u8]) -> Vec<String> {
        let members = parse_members(bytes).unwrap();
        let mut values = Vec::new();
        for member in members {
            let mut offset = member.data_start;
            while offset + member.observation_len <= member.data_end {
                let rest = &bytes[offset..member.data_end];
                if rest.len() < RECORD_LEN && rest.iter().all(|&b| b == b' ') {
                    break;
                }
                for v in member.variables.iter().filter(|v| v.is_character) {
                    let field = &bytes[offset + v.position..][..v.width];
                    values.push(String::from_utf8_lossy(field).trim_end().to_string());
                }
                offset += member.observation_len;
            }
        }
        values
    }

    #[test]
    fn test_parses_member_layout() {
        let bytes = sample();
        let members = parse_members(&bytes).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "DM");
        assert_eq!(members[0].observation_len, 30);
        assert_eq!(members[0].variables[2].position, 20);
        assert_eq!(char_values(&bytes), vec!["ACME-001", "acme lab", "ACME-002", "Boston"]);
    }

    #[test]
    fn test_replaces_character_values_case_insensitive() {
        let input = sample();
        let matcher = Matcher::new("acme", "GLOBEX", false).unwrap();

        let result = XptReplacer::new().replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 3);
        assert_eq!(result.bytes.len(), input.len());
        assert_eq!(
            char_values(&result.bytes),
            vec!["GLOBEX-001", "GLOBEX lab", "GLOBEX-002", "Boston"]
        );
    }

    #[test]
    fn test_shorter_value_is_blank_padded() {
        let input = sample();
        let matcher = Matcher::new("Boston", "NY", true).unwrap();

        let result = XptReplacer::new().replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(char_values(&result.bytes)[3], "NY");
    }

    #[test]
    fn test_value_overflowing_field_is_an_error() {
        let input = sample();
        let matcher = Matcher::new("Boston", "Massachusetts", true).unwrap();

        let err = XptReplacer::new().replace(&input, &matcher).unwrap_err();
        match err {
            FileReplaceError::XptValueTooLong { variable, length, width } => {
                assert_eq!(variable, "SITE");
                assert_eq!(length, 13);
                assert_eq!(width, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_windows_1252_values() {
        let mut input = library();
        build_member(
            &mut input,
            "PR",
            &[("PRICE", true, 8)],
            &[vec![Cell::Char("5 EUR")]],
        );
        let matcher = Matcher::new("EUR", "\u{20ac}", true).unwrap();

        let result = XptReplacer::new().replace(&input, &matcher).unwrap();

        assert_eq!(result.count, 1);
        let members = parse_members(&result.bytes).unwrap();
        let start = members[0].data_start;
        assert_eq!(&result.bytes[start..start + 8], b"5 \x80     ");
    }

    #[test]
    fn test_multiple_members() {
        let mut input = sample();
        build_member(
            &mut input,
            "AE",
            &[("TERM", true, 16)],
            &[vec![Cell::Char("acme headache")]],
        );
        let matcher = Matcher::new("ACME", "X", true).unwrap();

        let result = XptReplacer::new().replace(&input, &matcher).unwrap();

        assert_eq!(parse_members(&input).unwrap().len(), 2);
        assert_eq!(result.count, 2);
        assert_eq!(
            char_values(&result.bytes),
            vec!["X-001", "acme lab", "X-002", "Boston", "acme headache"]
        );
    }

    #[test]
    fn test_no_match_is_byte_identical() {
        let input = sample();
        let matcher = Matcher::new("zzz", "y", false).unwrap();

        let result = XptReplacer::new().replace(&input, &matcher).unwrap();
        assert_eq!(result.count, 0);
        assert_eq!(result.bytes, input);
    }

    #[test]
    fn test_rejects_non_transport_files() {
        let matcher = Matcher::new("a", "b", false).unwrap();
        let err = XptReplacer::new()
            .replace(&pad("hello", 240), &matcher)
            .unwrap_err();
        assert!(matches!(err, FileReplaceError::Xpt(_)));
    }
}
