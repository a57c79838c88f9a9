//! # Payload Module
//!
//! Request bodies are decoded once per request, before the handler runs. The
//! router never parses JSON itself: decoding is delegated to a
//! [`PayloadDecoder`] and only the resulting [`ParseStatus`] taxonomy is
//! interpreted by the dispatcher.
//!
//! An empty body is not an error. It yields `exists = false` and
//! [`ParseStatus::NotAttempted`].

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Outcome of decoding a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    /// No body was supplied.
    NotAttempted,
    /// The body decoded successfully.
    Ok,
    /// Nesting exceeded the decoder's recursion limit.
    DepthExceeded,
    /// Mismatched closing bracket or brace.
    StateMismatch,
    /// A raw control character inside a string.
    ControlChar,
    /// Any other malformed JSON.
    SyntaxError,
    /// The body is not valid UTF-8.
    InvalidEncoding,
    /// The decoder failed for a reason outside this taxonomy.
    Unknown,
}

impl ParseStatus {
    /// Wire name used in `json_error` fields and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStatus::NotAttempted => "none",
            ParseStatus::Ok => "none",
            ParseStatus::DepthExceeded => "stack_depth_exceeded",
            ParseStatus::StateMismatch => "state_mismatch",
            ParseStatus::ControlChar => "unexpected_control_char",
            ParseStatus::SyntaxError => "syntax_error",
            ParseStatus::InvalidEncoding => "malformed_utf8",
            ParseStatus::Unknown => "unknown",
        }
    }

    /// Whether this status represents a decode failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, ParseStatus::NotAttempted | ParseStatus::Ok)
    }
}

/// A request body together with the result of decoding it.
///
/// `exists == false` always implies `status == NotAttempted` and `value == None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    raw: Vec<u8>,
    exists: bool,
    status: ParseStatus,
    value: Option<Value>,
}

impl DecodedPayload {
    /// A payload for a request without a body.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            raw: Vec::new(),
            exists: false,
            status: ParseStatus::NotAttempted,
            value: None,
        }
    }

    /// A successfully decoded payload.
    #[must_use]
    pub fn decoded(raw: Vec<u8>, value: Value) -> Self {
        Self {
            raw,
            exists: true,
            status: ParseStatus::Ok,
            value: Some(value),
        }
    }

    /// A payload that was present but failed to decode.
    ///
    /// `status` must be one of the failure kinds; a success status is mapped to
    /// [`ParseStatus::Unknown`] to keep the invariants intact.
    #[must_use]
    pub fn failed(raw: Vec<u8>, status: ParseStatus) -> Self {
        let status = if status.is_failure() {
            status
        } else {
            ParseStatus::Unknown
        };
        Self {
            raw,
            exists: true,
            status,
            value: None,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.exists
    }

    #[must_use]
    pub fn status(&self) -> ParseStatus {
        self.status
    }

    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl Default for DecodedPayload {
    fn default() -> Self {
        Self::empty()
    }
}

/// Turns raw request bytes into a [`DecodedPayload`].
pub trait PayloadDecoder: Send + Sync {
    fn decode(&self, raw: &[u8]) -> DecodedPayload;
}

/// The default decoder, backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl PayloadDecoder for JsonDecoder {
    fn decode(&self, raw: &[u8]) -> DecodedPayload {
        if raw.is_empty() {
            return DecodedPayload::empty();
        }

        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(err) => {
                debug!(valid_up_to = err.valid_up_to(), "Request body is not UTF-8");
                return DecodedPayload::failed(raw.to_vec(), ParseStatus::InvalidEncoding);
            }
        };

        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                debug!(
                    body_size_bytes = raw.len(),
                    body_fields = value.as_object().map(|o| o.len()),
                    "JSON body parsed"
                );
                DecodedPayload::decoded(raw.to_vec(), value)
            }
            Err(err) => {
                let status = classify(&err, text);
                debug!(
                    error = %err,
                    json_error = status.as_str(),
                    "JSON body parse failed"
                );
                DecodedPayload::failed(raw.to_vec(), status)
            }
        }
    }
}

/// Map a `serde_json` error onto the decode taxonomy.
///
/// `serde_json` only exposes a coarse category, so the finer kinds are read off
/// the error message. A "expected `,` or `]`" error is only a state mismatch
/// when the offending byte is itself a closer; a missing comma is a syntax error.
fn classify(err: &serde_json::Error, text: &str) -> ParseStatus {
    use serde_json::error::Category;

    match err.classify() {
        Category::Io => ParseStatus::Unknown,
        Category::Data => ParseStatus::Unknown,
        Category::Syntax | Category::Eof => {
            let msg = err.to_string();
            if msg.starts_with("recursion limit exceeded") {
                ParseStatus::DepthExceeded
            } else if msg.starts_with("control character") {
                ParseStatus::ControlChar
            } else if (msg.starts_with("expected `,` or `]`")
                || msg.starts_with("expected `,` or `}`"))
                && matches!(byte_at(text, err.line(), err.column()), Some(b']' | b'}'))
            {
                ParseStatus::StateMismatch
            } else {
                ParseStatus::SyntaxError
            }
        }
    }
}

/// The byte at a 1-based `line`/`column` error position.
fn byte_at(text: &str, line: usize, column: usize) -> Option<u8> {
    let line = text.split('\n').nth(line.checked_sub(1)?)?;
    line.as_bytes().get(column.checked_sub(1)?).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: &[u8]) -> DecodedPayload {
        JsonDecoder.decode(raw)
    }

    #[test]
    fn test_empty_body_is_not_attempted() {
        let p = decode(b"");
        assert!(!p.exists());
        assert_eq!(p.status(), ParseStatus::NotAttempted);
        assert!(p.value().is_none());
    }

    #[test]
    fn test_valid_body() {
        let p = decode(br#"{"title":"Emma"}"#);
        assert!(p.exists());
        assert_eq!(p.status(), ParseStatus::Ok);
        assert_eq!(p.value(), Some(&json!({"title": "Emma"})));
        assert_eq!(p.raw(), br#"{"title":"Emma"}"#);
    }

    #[test]
    fn test_syntax_error() {
        let p = decode(b"{not json");
        assert!(p.exists());
        assert_eq!(p.status(), ParseStatus::SyntaxError);
        assert!(p.value().is_none());
    }

    #[test]
    fn test_truncated_body_is_syntax_error() {
        assert_eq!(decode(b"{\"a\": 1").status(), ParseStatus::SyntaxError);
    }

    #[test]
    fn test_mismatched_closer() {
        assert_eq!(decode(b"[1}").status(), ParseStatus::StateMismatch);
        assert_eq!(decode(b"{\"a\":1]").status(), ParseStatus::StateMismatch);
        assert_eq!(decode(b"{\n  \"a\": [1,\n  2}\n}").status(), ParseStatus::StateMismatch);
    }

    #[test]
    fn test_missing_comma_is_syntax_error() {
        assert_eq!(decode(b"[1 2]").status(), ParseStatus::SyntaxError);
        assert_eq!(decode(b"{\"a\":1 \"b\":2}").status(), ParseStatus::SyntaxError);
        assert_eq!(decode(b"[\n1\n2\n]").status(), ParseStatus::SyntaxError);
    }

    #[test]
    fn test_byte_at() {
        assert_eq!(byte_at("[1}", 1, 3), Some(b'}'));
        assert_eq!(byte_at("[\n1]", 2, 2), Some(b']'));
        assert_eq!(byte_at("[1}", 0, 1), None);
        assert_eq!(byte_at("[1}", 1, 9), None);
    }

    #[test]
    fn test_control_character() {
        assert_eq!(decode(b"\"a\x01b\"").status(), ParseStatus::ControlChar);
    }

    #[test]
    fn test_depth_exceeded() {
        let deep = "[".repeat(200) + &"]".repeat(200);
        assert_eq!(
            decode(deep.as_bytes()).status(),
            ParseStatus::DepthExceeded
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(
            decode(&[b'"', 0xff, 0xfe, b'"']).status(),
            ParseStatus::InvalidEncoding
        );
    }

    #[test]
    fn test_failed_keeps_invariants() {
        let p = DecodedPayload::failed(b"x".to_vec(), ParseStatus::Ok);
        assert_eq!(p.status(), ParseStatus::Unknown);
        assert!(p.exists());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(ParseStatus::SyntaxError.as_str(), "syntax_error");
        assert_eq!(ParseStatus::DepthExceeded.as_str(), "stack_depth_exceeded");
        assert_eq!(ParseStatus::InvalidEncoding.as_str(), "malformed_utf8");
        assert!(!ParseStatus::Ok.is_failure());
        assert!(ParseStatus::ControlChar.is_failure());
    }
}
