use super::{strip_base_path, CompiledPattern, LoadPolicy, RouteTable, Router};
use crate::error::RouteSpecError;

fn router(spec: &str) -> Router {
    Router::new(RouteTable::parse(spec, LoadPolicy::Strict).unwrap().table)
}

#[test]
fn test_root_path() {
    let p = CompiledPattern::compile("/").unwrap();
    assert!(p.is_match("/"));
    assert!(p.is_match("/?x=1"));
    assert!(!p.is_match("/books"));
    assert!(p.param_names().is_empty());
}

#[test]
fn test_parameterized_path() {
    let p = CompiledPattern::compile("/items/{id}").unwrap();
    assert!(p.is_match("/items/123"));
    assert!(!p.is_match("/items/"));
    assert!(!p.is_match("/items/1/2"));
    assert_eq!(p.param_names().len(), 1);
    assert_eq!(p.param_names()[0].as_ref(), "id");
}

#[test]
fn test_literal_path_is_anchored() {
    let p = CompiledPattern::compile("/books").unwrap();
    assert!(p.is_match("/books"));
    assert!(p.is_match("/books?page=2"));
    assert!(!p.is_match("/books/"));
    assert!(!p.is_match("/api/books"));
    assert!(!p.is_match("/bookshelf"));
}

#[test]
fn test_regex_metacharacters_are_literal() {
    let p = CompiledPattern::compile("/files/a.b+c").unwrap();
    assert!(p.is_match("/files/a.b+c"));
    assert!(!p.is_match("/files/aXbbc"));
}

#[test]
fn test_query_string_is_not_captured() {
    let p = CompiledPattern::compile("/books/{id}").unwrap();
    let params = p.captures("/books/7?format=short").unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0.as_ref(), "id");
    assert_eq!(params[0].1, "7");

    let p = CompiledPattern::compile("/books/{id}/reviews").unwrap();
    let params = p.captures("/books/7/reviews?sort=asc").unwrap();
    assert_eq!(params[0].1, "7");
}

#[test]
fn test_unbalanced_braces() {
    for template in ["/a/{b", "/a/b}", "/a/{{b}", "/a/{b}}"] {
        let err = CompiledPattern::compile(template).unwrap_err();
        assert!(
            matches!(err, RouteSpecError::UnbalancedBraces { .. }),
            "{template}: {err}"
        );
    }
}

#[test]
fn test_invalid_placeholder_names() {
    for template in ["/a/{}", "/a/{1abc}", "/a/{b-c}"] {
        let err = CompiledPattern::compile(template).unwrap_err();
        assert!(
            matches!(err, RouteSpecError::InvalidPlaceholder { .. }),
            "{template}: {err}"
        );
    }
    assert!(CompiledPattern::compile("/a/{_b9}").is_ok());
}

#[test]
fn test_duplicate_placeholder_rejected() {
    let err = CompiledPattern::compile("/org/{id}/user/{id}").unwrap_err();
    assert!(matches!(err, RouteSpecError::DuplicatePlaceholder { .. }));
}

#[test]
fn test_first_match_wins() {
    let r = router("/books - Books\n/books/{id} - Book");
    let m = r.route("/books").unwrap();
    assert_eq!(m.handler_name(), "Books");
    assert!(m.path_params.is_empty());

    let m = r.route("/books/7").unwrap();
    assert_eq!(m.handler_name(), "Book");
    assert_eq!(m.get_path_param("id"), Some("7"));
}

#[test]
fn test_order_beats_specificity() {
    let r = router("/books/{id} - Book\n/books/new - NewBook");
    assert_eq!(r.route("/books/new").unwrap().handler_name(), "Book");
}

#[test]
fn test_empty_table_never_matches() {
    let r = Router::default();
    assert!(r.route("/").is_none());
    assert!(r.route("/anything").is_none());
}

#[test]
fn test_strip_base_path() {
    assert_eq!(strip_base_path("/api/books", "/api"), "/books");
    assert_eq!(strip_base_path("/api", "/api"), "/");
    assert_eq!(strip_base_path("/api/", "/api/"), "/");
    assert_eq!(strip_base_path("/apix/books", "/api"), "/apix/books");
    assert_eq!(strip_base_path("/books", ""), "/books");
    assert_eq!(strip_base_path("", ""), "/");
    assert_eq!(strip_base_path("/api?page=2", "/api"), "/?page=2");
}

#[test]
fn test_router_base_path() {
    let r = router("/books - Books").with_base_path("/api/");
    assert_eq!(r.base_path(), "/api");
    let uri = r.api_uri("/api/books");
    assert_eq!(r.route(&uri).unwrap().handler_name(), "Books");
}
