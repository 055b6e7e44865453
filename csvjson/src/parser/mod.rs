//! CSV to typed record parser.
//!
//! Handles the RFC 4180 subset: `,` delimiter, `"` quoting, doubled quotes
//! inside quoted fields and newlines embedded in quoted fields. Data cells are
//! coerced to numbers and booleans; header cells are kept verbatim.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CsvError, CsvResult};
use crate::models::{Document, FieldValue, Record};

const DELIMITER: char = ',';
const QUOTE: char = '"';

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").expect("numeric pattern is valid"));

/// Tokenizer state shared by line splitting and cell splitting.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// Just read a `"` inside a quoted field: either an escape or the close.
    QuotedQuote,
}

/// One CSV record's text, possibly spanning several physical lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine<'a> {
    /// 1-based physical line where the record starts.
    pub line: usize,
    /// Text without the line terminator.
    pub text: &'a str,
}

/// One delimiter-separated unit, unquoted but not yet coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: String,
    pub quoted: bool,
}

/// Decoded input together with the encoding it was read as.
#[derive(Debug, Clone)]
pub struct ParsedInput {
    pub document: Document,
    pub encoding: String,
}

/// Parse CSV text into a [`Document`].
///
/// The first non-blank logical line is the header. Blank lines are skipped,
/// short rows are padded with empty strings and long rows are truncated.
///
/// # Example
/// ```
/// use csvjson::parse;
///
/// let doc = parse("id,active\n1,true\n2,false").unwrap();
/// assert_eq!(doc.len(), 2);
/// assert_eq!(doc.records()[0].get("active").and_then(|v| v.as_bool()), Some(true));
/// ```
pub fn parse(text: &str) -> CsvResult<Document> {
    if text.is_empty() {
        return Err(CsvError::EmptyInput);
    }
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = split_logical_lines(text)?
        .into_iter()
        .filter(|l| !l.text.is_empty());

    let header = lines.next().ok_or(CsvError::NoHeaders)?;
    let headers: Arc<[String]> = split_cells(header.text)
        .into_iter()
        .map(|c| c.value)
        .collect();

    let records = lines
        .map(|l| {
            let values = split_cells(l.text).iter().map(coerce).collect();
            Record::new(Arc::clone(&headers), values)
        })
        .collect();

    Ok(Document::new(headers, records))
}

/// Decode raw bytes and parse them.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<ParsedInput> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyInput);
    }
    let (content, encoding) = decode_bytes(bytes);
    let document = parse(&content)?;
    Ok(ParsedInput { document, encoding })
}

/// Split text into logical lines.
///
/// `\n`, `\r\n` and a lone `\r` end a line unless they sit inside a quoted
/// field. Fails if a quoted field is still open at end of input.
pub fn split_logical_lines(text: &str) -> CsvResult<Vec<LogicalLine<'_>>> {
    let mut lines = Vec::new();
    let mut state = State::FieldStart;
    let mut start = 0;
    let mut start_line = 1;
    let mut physical = 1;
    let mut quote_line = 1;

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (state, c) {
            (State::Quoted, QUOTE) => state = State::QuotedQuote,
            (State::Quoted, '\n') => physical += 1,
            (State::Quoted, '\r') => {
                if !matches!(chars.peek(), Some((_, '\n'))) {
                    physical += 1;
                }
            }
            (State::Quoted, _) => {}
            (State::QuotedQuote, QUOTE) => state = State::Quoted,
            (_, '\n' | '\r') => {
                lines.push(LogicalLine {
                    line: start_line,
                    text: &text[start..i],
                });
                let mut end = i + 1;
                if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
                    chars.next();
                    end += 1;
                }
                physical += 1;
                start = end;
                start_line = physical;
                state = State::FieldStart;
            }
            (State::FieldStart, QUOTE) => {
                quote_line = physical;
                state = State::Quoted;
            }
            (_, DELIMITER) => state = State::FieldStart,
            _ => state = State::Unquoted,
        }
    }

    if state == State::Quoted {
        return Err(CsvError::unterminated_quote(quote_line));
    }
    if start < text.len() {
        lines.push(LogicalLine {
            line: start_line,
            text: &text[start..],
        });
    }
    Ok(lines)
}

/// Split one logical line into cells, removing quotes and unescaping `""`.
///
/// A quote only opens a quoted field at the start of a cell; elsewhere it is
/// literal text.
pub fn split_cells(line: &str) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut state = State::FieldStart;

    for c in line.chars() {
        match (state, c) {
            (State::Quoted, QUOTE) => state = State::QuotedQuote,
            (State::Quoted, _) => current.push(c),
            (State::QuotedQuote, QUOTE) => {
                current.push(QUOTE);
                state = State::Quoted;
            }
            (State::FieldStart, QUOTE) => {
                quoted = true;
                state = State::Quoted;
            }
            (_, DELIMITER) => {
                cells.push(Cell {
                    value: std::mem::take(&mut current),
                    quoted,
                });
                quoted = false;
                state = State::FieldStart;
            }
            _ => {
                current.push(c);
                state = State::Unquoted;
            }
        }
    }
    cells.push(Cell {
        value: current,
        quoted,
    });
    cells
}

/// Coerce a cell to its runtime type. Quoted cells always stay strings.
pub fn coerce(cell: &Cell) -> FieldValue {
    if cell.quoted {
        return FieldValue::String(cell.value.clone());
    }
    coerce_str(&cell.value)
}

/// Coerce raw text: number, then boolean, else string.
pub fn coerce_str(raw: &str) -> FieldValue {
    if NUMERIC.is_match(raw) {
        if let Some(n) = parse_number(raw) {
            return FieldValue::Number(n);
        }
    } else if raw.eq_ignore_ascii_case("true") {
        return FieldValue::Boolean(true);
    } else if raw.eq_ignore_ascii_case("false") {
        return FieldValue::Boolean(false);
    }
    FieldValue::String(raw.to_string())
}

fn parse_number(raw: &str) -> Option<serde_json::Number> {
    if !raw.contains('.') {
        // Integers wider than u64 would be rounded as f64; keep them as text.
        return raw
            .parse::<i64>()
            .map(serde_json::Number::from)
            .or_else(|_| raw.parse::<u64>().map(serde_json::Number::from))
            .ok();
    }
    raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes as UTF-8, falling back to charset detection.
///
/// Returns the decoded text and the name of the encoding used.
pub fn decode_bytes(bytes: &[u8]) -> (String, String) {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return (s.to_string(), "utf-8".to_string());
    }
    let encoding = detect_encoding(bytes);
    let decoder = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .filter(|e| *e != encoding_rs::UTF_8)
        .unwrap_or(encoding_rs::WINDOWS_1252);
    let (text, _, _) = decoder.decode(bytes);
    (text.into_owned(), decoder.name().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json(doc: &Document) -> serde_json::Value {
        serde_json::to_value(doc).unwrap()
    }

    #[test]
    fn test_simple_csv() {
        let doc = parse("name,age\nAlice,30\nBob,25").unwrap();

        assert_eq!(doc.headers(), ["name", "age"]);
        assert_eq!(doc.len(), 2);
        assert_eq!(
            to_json(&doc),
            json!([{"name": "Alice", "age": 30}, {"name": "Bob", "age": 25}])
        );
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,note\nAlice,\"hello, world\"\nBob,\"she said \"\"hi\"\"\"\n";
        let doc = parse(csv).unwrap();

        assert_eq!(
            to_json(&doc),
            json!([
                {"name": "Alice", "note": "hello, world"},
                {"name": "Bob", "note": "she said \"hi\""}
            ])
        );
    }

    #[test]
    fn test_coercion() {
        let doc = parse("id,active\n1,true\n2,false").unwrap();
        let first = &doc.records()[0];

        assert!(first.get("id").and_then(FieldValue::as_number).is_some());
        assert_eq!(first.get("active"), Some(&FieldValue::Boolean(true)));
        assert_eq!(to_json(&doc), json!([{"id": 1, "active": true}, {"id": 2, "active": false}]));
    }

    #[test]
    fn test_coerce_str_patterns() {
        assert_eq!(coerce_str("42"), FieldValue::from(42i64));
        assert_eq!(coerce_str("-7"), FieldValue::from(-7i64));
        assert_eq!(coerce_str("3.25").as_number().and_then(|n| n.as_f64()), Some(3.25));
        assert_eq!(coerce_str("TRUE"), FieldValue::Boolean(true));
        assert_eq!(coerce_str("False"), FieldValue::Boolean(false));
        assert_eq!(coerce_str("1e5"), FieldValue::from("1e5"));
        assert_eq!(coerce_str("1.2.3"), FieldValue::from("1.2.3"));
        assert_eq!(coerce_str(" 1"), FieldValue::from(" 1"));
        assert_eq!(coerce_str("yes"), FieldValue::from("yes"));
        assert_eq!(coerce_str(""), FieldValue::empty());
    }

    #[test]
    fn test_integer_beyond_i64_uses_u64() {
        let doc = parse("id\n12345678901234567891\n").unwrap();
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"[{"id":12345678901234567891}]"#);

        let max = u64::MAX.to_string();
        let value = coerce_str(&max);
        assert_eq!(value.as_number().and_then(|n| n.as_u64()), Some(u64::MAX));
    }

    #[test]
    fn test_integer_beyond_u64_stays_string() {
        let wide = "123456789012345678901234567890";
        assert_eq!(coerce_str(wide), FieldValue::from(wide));

        let negative = "-9223372036854775809";
        assert_eq!(coerce_str(negative), FieldValue::from(negative));

        let huge = "9".repeat(400);
        assert_eq!(coerce_str(&huge), FieldValue::String(huge.clone()));
    }

    #[test]
    fn test_duplicate_header_names_repeat_keys() {
        let doc = parse("a,a\n1,2").unwrap();
        assert_eq!(doc.records()[0].len(), 2);
        assert_eq!(doc.records()[0].get("a"), Some(&FieldValue::from(1i64)));
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"[{"a":1,"a":2}]"#);

        // Generic JSON readers keep the last value
        let generic: serde_json::Value = serde_json::from_str(&serde_json::to_string(&doc).unwrap()).unwrap();
        assert_eq!(generic, json!([{"a": 2}]));
    }

    #[test]
    fn test_quoted_cells_stay_strings() {
        let doc = parse("zip,flag\n\"007\",\"true\"").unwrap();
        assert_eq!(to_json(&doc), json!([{"zip": "007", "flag": "true"}]));
    }

    #[test]
    fn test_missing_values_padded() {
        let doc = parse("a,b,c\nx,y").unwrap();
        assert_eq!(to_json(&doc), json!([{"a": "x", "b": "y", "c": ""}]));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let doc = parse("a,b\n1,2,3,4").unwrap();
        assert_eq!(doc.records()[0].len(), 2);
        assert_eq!(to_json(&doc), json!([{"a": 1, "b": 2}]));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let doc = parse("a,b\n1,2\n\n3,4\n\n").unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse(""), Err(CsvError::EmptyInput)));
        assert!(matches!(parse_bytes(b""), Err(CsvError::EmptyInput)));
    }

    #[test]
    fn test_blank_only_input_has_no_headers() {
        assert!(matches!(parse("\n\r\n\n"), Err(CsvError::NoHeaders)));
    }

    #[test]
    fn test_header_only() {
        let doc = parse("a,b,c\n").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.headers().len(), 3);
        assert_eq!(serde_json::to_string_pretty(&doc).unwrap(), "[]");
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("a,b\n1,2\n3,\"open\nstill open").unwrap_err();
        match err {
            CsvError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_quoted_newline_is_part_of_field() {
        let doc = parse("id,text\n1,\"line one\nline two\"\n2,plain").unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.records()[0].get("text"),
            Some(&FieldValue::from("line one\nline two"))
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = parse("a,b\r\n1,x\r\n2,y\r\n").unwrap();
        assert_eq!(to_json(&doc), json!([{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]));
    }

    #[test]
    fn test_bom_is_ignored() {
        let doc = parse("\u{feff}id,name\n1,a").unwrap();
        assert_eq!(doc.headers(), ["id", "name"]);
    }

    #[test]
    fn test_quoted_header_cells() {
        let doc = parse("\"first, name\",\"say \"\"x\"\"\"\nA,B").unwrap();
        assert_eq!(doc.headers(), ["first, name", "say \"x\""]);
    }

    #[test]
    fn test_logical_line_numbers() {
        let lines = split_logical_lines("h\n\"a\nb\"\nc").unwrap();
        let starts: Vec<usize> = lines.iter().map(|l| l.line).collect();
        assert_eq!(starts, vec![1, 2, 4]);
        assert_eq!(lines[1].text, "\"a\nb\"");
    }

    #[test]
    fn test_split_cells_literal_quote_mid_field() {
        let cells = split_cells("ab\"c,\"d\"e,");
        let values: Vec<&str> = cells.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["ab\"c", "de", ""]);
        assert!(!cells[0].quoted);
        assert!(cells[1].quoted);
    }

    #[test]
    fn test_record_shape_matches_header() {
        let csv = "a,b,c,d\n1\n1,2\n1,2,3,4,5\n,,,\n";
        let doc = parse(csv).unwrap();

        assert_eq!(doc.len(), 4);
        for record in doc.records() {
            assert_eq!(record.columns(), doc.headers());
            assert_eq!(record.len(), 4);
        }
    }

    #[test]
    fn test_decode_utf8_passthrough() {
        let (text, encoding) = decode_bytes("Société,1".as_bytes());
        assert_eq!(text, "Société,1");
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let (text, encoding) = decode_bytes(bytes);
        assert!(text.starts_with("Soci"));
        assert_ne!(encoding, "utf-8");
    }
}
