//! End-to-end requests against the Library demo API.

mod common;

use common::{call, demo};
use hmrouter::dispatcher::Disposition;
use hmrouter::resource::Operation;
use http::Method;
use serde_json::{json, Value};

fn links(body: &Value) -> Vec<(String, String, String, String)> {
    body["hypermedia"]["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| {
            (
                l["title"].as_str().unwrap().to_string(),
                l["href"].as_str().unwrap().to_string(),
                l["rel"].as_str().unwrap().to_string(),
                l["method"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn link(title: &str, href: &str, rel: &str, method: &str) -> (String, String, String, String) {
    (title.into(), href.into(), rel.into(), method.into())
}

#[test]
fn test_root_options() {
    let (out, body) = call(&demo(), Method::OPTIONS, "/", b"");
    assert_eq!(out.response.status, 200);
    assert_eq!(body["hypermedia"]["title"], "Library API Root");
    assert_eq!(
        body["hypermedia"]["description"],
        "Welcome! Try the /books/ (Books Collection) resource."
    );
    assert_eq!(
        links(&body),
        vec![
            link("books", "/books", "child", "OPTIONS"),
            link("authors", "/authors", "child", "OPTIONS"),
            link("Self OPTIONS", "/", "self", "OPTIONS"),
        ]
    );
}

#[test]
fn test_root_get_is_405() {
    let (out, _) = call(&demo(), Method::GET, "/", b"");
    assert_eq!(out.response.status, 405);
}

#[test]
fn test_books_collection_options() {
    let (_, body) = call(&demo(), Method::OPTIONS, "/books", b"");
    assert_eq!(body["hypermedia"]["title"], "Books Collection");
    assert_eq!(
        links(&body),
        vec![
            link("/", "/", "parent", "OPTIONS"),
            link("Self OPTIONS", "/books", "self", "OPTIONS"),
            link("Self GET", "/books", "self", "GET"),
            link("Self POST", "/books", "self", "POST"),
        ]
    );
}

#[test]
fn test_books_collection_get_lists_items() {
    let (out, body) = call(&demo(), Method::GET, "/books", b"");
    assert_eq!(out.disposition, Disposition::Invoked(Operation::Get));
    let items = links(&body);
    assert_eq!(items.len(), 6);
    assert_eq!(items[0], link("Pride and Prejudice", "/books/57", "item", "OPTIONS"));
    assert_eq!(items[5], link("Catch 22", "/books/98", "item", "OPTIONS"));
    assert!(body["hypermedia"].get("title").is_none());
}

#[test]
fn test_books_collection_post() {
    let d = demo();
    let (_, body) = call(&d, Method::POST, "/books", br#"{"title": "Emma"}"#);
    assert_eq!(body, json!({"new_id": 100}));

    let (out, body) = call(&d, Method::POST, "/books", b"{\"title\": ");
    assert_eq!(out.response.status, 400);
    assert_eq!(body["json_error"], "syntax_error");
}

#[test]
fn test_book_get() {
    let (_, body) = call(&demo(), Method::GET, "/books/57", b"");
    assert_eq!(
        body,
        json!({"id": "57", "title": "Pride and Prejudice", "author": "Jane Austen"})
    );
}

#[test]
fn test_book_options_is_retitled() {
    let (_, body) = call(&demo(), Method::OPTIONS, "/books/64", b"");
    assert_eq!(body["hypermedia"]["title"], "The Lord of the Rings");
    assert_eq!(
        body["hypermedia"]["description"],
        "You can GET this book's data, POST updates, or DELETE it."
    );
    assert_eq!(
        links(&body),
        vec![
            link("/books", "/books", "parent", "OPTIONS"),
            link("reviews", "/books/64/reviews", "child", "OPTIONS"),
            link("Self OPTIONS", "/books/64", "self", "OPTIONS"),
            link("Self GET", "/books/64", "self", "GET"),
        ]
    );
}

#[test]
fn test_unknown_book_halts_with_404() {
    let d = demo();
    for (method, path) in [
        (Method::GET, "/books/1"),
        (Method::OPTIONS, "/books/1"),
        (Method::DELETE, "/books/1"),
        (Method::GET, "/books/1/reviews"),
    ] {
        let (out, body) = call(&d, method, path, b"");
        assert_eq!(out.disposition, Disposition::Halted, "{path}");
        assert_eq!(out.response.status, 404);
        assert_eq!(body["hypermedia"]["title"], "404 Not Found");
        assert_eq!(
            body["hypermedia"]["description"],
            "Could not find a book with ID 1."
        );
    }
}

#[test]
fn test_book_delete_is_405() {
    let (out, body) = call(&demo(), Method::DELETE, "/books/57", b"");
    assert_eq!(out.response.status, 405);
    assert!(body["hypermedia"]["description"]
        .as_str()
        .unwrap()
        .contains("DELETE"));
}

#[test]
fn test_reviews_collection() {
    let d = demo();
    let (_, body) = call(&d, Method::OPTIONS, "/books/71/reviews", b"");
    assert_eq!(body["hypermedia"]["title"], "Reviews for Jane Eyre");
    assert_eq!(links(&body)[0], link("/books/71", "/books/71", "parent", "OPTIONS"));

    let (_, first) = call(&d, Method::GET, "/books/71/reviews", b"");
    let (_, second) = call(&d, Method::GET, "/books/71/reviews", b"");
    assert_eq!(first, second);
    let items = links(&first);
    let titles: Vec<&str> = items.iter().map(|l| l.0.as_str()).collect();
    assert_eq!(titles, vec!["Love it", "Boring!", "Thoughtful", "My Favorite book"]);
    for item in &items {
        assert!(item.1.starts_with("/books/71/reviews/"));
        assert_eq!(item.2, "item");
    }
}

#[test]
fn test_review_get() {
    let (_, body) = call(&demo(), Method::GET, "/books/57/reviews/12", b"");
    assert_eq!(body["book_id"], "57");
    assert_eq!(body["review_author"], "John Doe");
    assert_eq!(body["rating"], 3);
}

#[test]
fn test_review_options_has_parent() {
    let (_, body) = call(&demo(), Method::OPTIONS, "/books/57/reviews/12", b"");
    assert_eq!(body["hypermedia"]["title"], "Book Review");
    assert_eq!(links(&body)[0], link("/books/57/reviews", "/books/57/reviews", "parent", "OPTIONS"));
}

#[test]
fn test_authors() {
    let (_, body) = call(&demo(), Method::GET, "/authors", b"");
    assert_eq!(
        body,
        json!({"authors_list": [
            "Jane Austen",
            "JRR Tolkien",
            "Charlotte Bronte",
            "Emily Bronte",
            "Charles Dickens",
            "Joseph Heller"
        ]})
    );
}

#[test]
fn test_unknown_path() {
    let (out, body) = call(&demo(), Method::GET, "/magazines", b"");
    assert_eq!(out.disposition, Disposition::NoRoute);
    assert!(body["hypermedia"]["description"]
        .as_str()
        .unwrap()
        .contains("/magazines"));
}

#[test]
fn test_base_path_and_query_string() {
    let d = hmrouter::demo::dispatcher("/api").unwrap();
    let (_, body) = call(&d, Method::GET, "/api/books/82?fields=title", b"");
    assert_eq!(body["title"], "Great Expectations");

    let (_, body) = call(&d, Method::OPTIONS, "/api", b"");
    assert_eq!(body["hypermedia"]["title"], "Library API Root");

    let (out, _) = call(&d, Method::OPTIONS, "/api?verbose=1", b"");
    assert_eq!(out.response.status, 200);

    let (_, body) = call(&d, Method::GET, "/api/books/71/reviews?page=2", b"");
    assert_eq!(links(&body).len(), 4);
    assert!(links(&body)[0].1.starts_with("/books/71/reviews/"));
}
