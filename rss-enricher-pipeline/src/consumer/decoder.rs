//! Payload decoding.
//!
//! Feed items arrive as UTF-8 JSON that may carry stray NUL and SOH control
//! bytes, broken UTF-8 sequences, surrounding whitespace and a byte-order
//! mark. Cleaning never fails; parsing fails with a [`DecodeError`] that
//! carries enough detail to diagnose the payload.

use rss_enricher_shared::ParsedMessage;
use serde_json::Value;
use thiserror::Error;

/// The "start of heading" control byte some producers prepend to payloads.
pub const START_OF_HEADING: u8 = 0x01;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A payload that could not be parsed into a JSON object.
#[derive(Debug, Clone, Error)]
#[error("Failed to parse JSON: {reason} at line {line} column {column}")]
pub struct DecodeError {
    /// What went wrong.
    pub reason: String,
    /// The cleaned text that was parsed.
    pub text: String,
    /// Byte offset of the error within `text`.
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl DecodeError {
    /// Code points of the first `count` characters of the cleaned text.
    pub fn leading_code_points(&self, count: usize) -> Vec<u32> {
        self.text.chars().take(count).map(u32::from).collect()
    }

    fn from_json(err: serde_json::Error, text: String) -> Self {
        let line = err.line();
        let column = err.column();
        let position = byte_offset(&text, line, column);
        let mut reason = err.to_string();
        if let Some(at) = reason.rfind(" at line ") {
            reason.truncate(at);
        }

        Self {
            reason,
            text,
            position,
            line,
            column,
        }
    }
}

/// Strip NUL and SOH bytes, decode as UTF-8 dropping invalid sequences, trim
/// surrounding whitespace and a single leading byte-order mark.
pub fn clean_payload(raw: &[u8]) -> String {
    let filtered: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|byte| *byte != 0x00 && *byte != START_OF_HEADING)
        .collect();

    let mut decoded = String::with_capacity(filtered.len());
    for chunk in filtered.utf8_chunks() {
        decoded.push_str(chunk.valid());
    }

    let trimmed = decoded.trim();
    trimmed
        .strip_prefix(BYTE_ORDER_MARK)
        .unwrap_or(trimmed)
        .to_string()
}

/// Clean `raw` and parse it as a JSON object.
pub fn decode(raw: &[u8]) -> Result<ParsedMessage, DecodeError> {
    parse(clean_payload(raw))
}

/// Parse already cleaned text as a JSON object.
pub fn parse(text: String) -> Result<ParsedMessage, DecodeError> {
    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => return Err(DecodeError::from_json(err, text)),
    };

    ParsedMessage::try_from(value).map_err(|other| DecodeError {
        reason: format!("expected a JSON object, found {}", json_kind(&other)),
        text,
        position: 0,
        line: 1,
        column: 1,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Convert serde_json's 1-based line/column into a byte offset.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_control_bytes_anywhere() {
        let raw = b"\x01\x00{\"title\":\x00\"T\x01\"}\x00";
        let cleaned = clean_payload(raw);

        assert_eq!(cleaned, r#"{"title":"T"}"#);
        assert!(!cleaned.contains('\u{0}'));
        assert!(!cleaned.contains('\u{1}'));
    }

    #[test]
    fn test_drops_invalid_utf8() {
        let mut raw = b"{\"title\":\"caf".to_vec();
        raw.extend_from_slice(&[0xC3, 0xA9, 0xFF, 0xFE]);
        raw.extend_from_slice(b"\"}");

        let cleaned = clean_payload(&raw);
        assert_eq!(cleaned, "{\"title\":\"café\"}");
        assert!(!cleaned.contains('\u{fffd}'));
    }

    #[test]
    fn test_trims_whitespace_and_bom() {
        let raw = "  \u{feff}{\"a\":1}\n".as_bytes();
        assert_eq!(clean_payload(raw), "{\"a\":1}");
    }

    #[test]
    fn test_only_one_bom_is_removed() {
        let raw = "\u{feff}\u{feff}{}".as_bytes();
        assert_eq!(clean_payload(raw), "\u{feff}{}");
    }

    #[test]
    fn test_cleaning_never_panics_on_garbage() {
        let raw: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
        let cleaned = clean_payload(&raw);
        assert!(!cleaned.contains('\u{0}'));
        assert!(!cleaned.contains('\u{1}'));
    }

    #[test]
    fn test_decode_object() {
        let message = decode(b"\x01{\"id\":\"a1\",\"title\":\"T\"}").unwrap();
        assert_eq!(message.text("id"), "a1");
        assert_eq!(message.keys().collect::<Vec<_>>(), vec!["id", "title"]);
    }

    #[test]
    fn test_decode_error_reports_position() {
        let err = decode(b"{\"title\": \"T\",\n \"link\" 42}").unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.text, "{\"title\": \"T\",\n \"link\" 42}");
        assert_eq!(&err.text[err.position..err.position + 2], "42");
        assert_eq!(err.leading_code_points(3), vec![123, 34, 116]);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode(b"[1, 2, 3]").unwrap_err();
        assert!(err.reason.contains("expected a JSON object"));
    }

    #[test]
    fn test_decode_empty_payload() {
        let err = decode(b"\x00\x01  ").unwrap_err();
        assert_eq!(err.text, "");
        assert_eq!(err.position, 0);
    }
}
