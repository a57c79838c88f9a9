use http::StatusCode;

/// Registered reason phrase for `code`, if any.
#[must_use]
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
}

/// Render `code` as a status line such as `404 Not Found`.
///
/// Codes without a registered reason phrase render as the bare number.
#[must_use]
pub fn status_line(code: u16) -> String {
    match reason_phrase(code) {
        Some(reason) => format!("{code} {reason}"),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(200), "200 OK");
        assert_eq!(status_line(404), "404 Not Found");
        assert_eq!(status_line(405), "405 Method Not Allowed");
        assert_eq!(status_line(500), "500 Internal Server Error");
    }

    #[test]
    fn test_unregistered_code_is_bare() {
        assert_eq!(status_line(299), "299");
        assert_eq!(status_line(42), "42");
        assert_eq!(reason_phrase(299), None);
    }
}
