use crate::response::{reason_phrase, status_line, Finalized};
use may_minihttp::Response;

/// Reason phrase sent on the wire; `may_minihttp` needs a `'static` string.
/// Unregistered codes go out with an empty phrase, i.e. the bare number.
fn wire_reason(status: u16) -> &'static str {
    reason_phrase(status).unwrap_or("")
}

/// Write a finalized response.
pub fn write_finalized(res: &mut Response, out: Finalized) {
    res.status_code(usize::from(out.status), wire_reason(out.status));
    res.header("Content-Type: application/json");
    res.body_vec(out.body.into_bytes());
}

/// Write a bare JSON error for requests that never reached the dispatcher.
pub fn write_json_error(res: &mut Response, status: u16, description: &str) {
    let body = serde_json::json!({
        "hypermedia": {
            "title": status_line(status),
            "description": description,
        }
    });
    res.status_code(usize::from(status), wire_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}
