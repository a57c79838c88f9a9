//! The per-request value bundle handed to every handler.

use crate::payload::DecodedPayload;
use crate::router::{ParamVec, RouteTable};
use http::Method;

/// Everything a handler may consult about the current request.
///
/// Built once per request by the dispatcher after the URI has been matched and
/// dropped when the response has been produced. It is never shared between
/// requests; only the route table inside it is, and that is read-only.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: String,
    params: ParamVec,
    query: Vec<(String, String)>,
    routes: RouteTable,
    payload: DecodedPayload,
}

impl RequestContext {
    /// Create a context for `uri`.
    ///
    /// Any query string is split off `uri`; the pairs become available through
    /// [`RequestContext::query_param`].
    #[must_use]
    pub fn new(
        method: Method,
        uri: &str,
        params: ParamVec,
        routes: RouteTable,
        payload: DecodedPayload,
    ) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (uri, Vec::new()),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method,
            uri: path.to_string(),
            params,
            query,
            routes,
            payload,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The matched API URI without its query string. Always starts with `/`.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }

    /// A path parameter captured by the matched template.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// A query string parameter; the last occurrence wins.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The full route table, used for link inference.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn payload(&self) -> &DecodedPayload {
        &self.payload
    }

    /// POST, PUT and PATCH carry a body the handler expects to read.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        is_mutating(&self.method)
    }
}

/// Whether a request with this method is expected to carry a JSON body.
#[must_use]
pub fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::ParamVec;
    use std::sync::Arc;

    fn ctx(method: Method, uri: &str) -> RequestContext {
        let mut params = ParamVec::new();
        params.push((Arc::from("book_id"), "57".to_string()));
        RequestContext::new(
            method,
            uri,
            params,
            RouteTable::default(),
            DecodedPayload::empty(),
        )
    }

    #[test]
    fn test_query_is_split_off() {
        let c = ctx(Method::GET, "/books/57?limit=10&limit=20&q=a%20b");
        assert_eq!(c.uri(), "/books/57");
        assert_eq!(c.query_param("limit"), Some("20"));
        assert_eq!(c.query_param("q"), Some("a b"));
        assert_eq!(c.query_param("missing"), None);
    }

    #[test]
    fn test_params() {
        let c = ctx(Method::GET, "/books/57");
        assert_eq!(c.param("book_id"), Some("57"));
        assert_eq!(c.param("review_id"), None);
    }

    #[test]
    fn test_empty_path_becomes_root() {
        assert_eq!(ctx(Method::GET, "?x=1").uri(), "/");
    }

    #[test]
    fn test_mutating_methods() {
        assert!(ctx(Method::POST, "/").is_mutating());
        assert!(ctx(Method::PUT, "/").is_mutating());
        assert!(ctx(Method::PATCH, "/").is_mutating());
        assert!(!ctx(Method::GET, "/").is_mutating());
        assert!(!ctx(Method::DELETE, "/").is_mutating());
        assert!(!ctx(Method::OPTIONS, "/").is_mutating());
    }
}
