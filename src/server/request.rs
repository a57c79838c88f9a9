use crate::dispatcher::InboundRequest;
use http::Method;
use may_minihttp::Request;
use std::io::{self, Read};
use tracing::{debug, info};

/// Build an [`InboundRequest`] from the pieces of a parsed HTTP request.
///
/// # Errors
///
/// `InvalidInput` if `method` is not a valid HTTP method token.
pub fn inbound_from_parts(method: &str, path: &str, body: Vec<u8>) -> io::Result<InboundRequest> {
    let method = Method::from_bytes(method.as_bytes()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid HTTP method '{method}': {e}"),
        )
    })?;
    let path = if path.is_empty() { "/" } else { path };
    Ok(InboundRequest::new(method, path, body))
}

/// Read method, path and body off a `may_minihttp` request.
///
/// # Errors
///
/// Propagates body read failures and invalid method tokens.
pub fn read_request(req: Request) -> io::Result<InboundRequest> {
    let method = req.method().to_string();
    let path = req.path().to_string();
    debug!(
        method = %method,
        path = %path,
        headers_count = req.headers().len(),
        "HTTP request parsed"
    );

    let mut body = Vec::new();
    let size = req.body().read_to_end(&mut body)?;
    if size > 0 {
        info!(body_size_bytes = size, "Request body read");
    }

    inbound_from_parts(&method, &path, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_from_parts() {
        let req = inbound_from_parts("POST", "/books?x=1", b"{}".to_vec()).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/books?x=1");
        assert_eq!(req.body, b"{}");
    }

    #[test]
    fn test_empty_path_is_root() {
        let req = inbound_from_parts("GET", "", Vec::new()).unwrap();
        assert_eq!(req.path, "/");
    }

    #[test]
    fn test_extension_methods_are_accepted() {
        let req = inbound_from_parts("PURGE", "/", Vec::new()).unwrap();
        assert_eq!(req.method.as_str(), "PURGE");
    }

    #[test]
    fn test_invalid_method_token() {
        let err = inbound_from_parts("GE T", "/", Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
