//! # Link Inference
//!
//! Derives parent and child links for the current resource from the route
//! table, so handlers do not have to enumerate their neighbours by hand.
//!
//! For every template in the table, each currently bound parameter is
//! substituted into its placeholder, giving a candidate URI. Against the
//! current URI a candidate is:
//!
//! - **self** if it is equal (skipped)
//! - a **parent** if it equals the current URI with its last segment removed
//! - a **child** if it is the current URI plus exactly one more segment; that
//!   segment becomes the link title
//!
//! A candidate that still contains a placeholder is neither: a parent/child
//! relation is only asserted between concrete paths at the current parameter
//! depth. From `/books`, the template `/books/{id}` is therefore not a child.

use crate::router::{ParamVec, RouteTable};
use crate::response::LinkEntry;
use tracing::debug;

/// Links derived from the route table for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedLinks {
    pub parents: Vec<LinkEntry>,
    pub children: Vec<LinkEntry>,
}

/// The URI one level up from `uri`, or `None` for the root.
///
/// `/books/7` → `/books`, `/books` → `/`.
#[must_use]
pub fn parent_uri(uri: &str) -> Option<String> {
    if uri == "/" || uri.is_empty() {
        return None;
    }
    let cut = uri.rfind('/')?;
    let parent = &uri[..cut];
    Some(if parent.is_empty() {
        "/".to_string()
    } else {
        parent.to_string()
    })
}

/// Substitute bound parameters into `template`; unbound placeholders stay as-is.
#[must_use]
pub fn resolve_template(template: &str, params: &ParamVec) -> String {
    substitute(template, params).0
}

/// One pass over the template's braces, so substituted values are never
/// rescanned. The flag is false when some placeholder had no bound value.
fn substitute(template: &str, params: &ParamVec) -> (String, bool) {
    let mut out = String::with_capacity(template.len());
    let mut complete = true;
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return (out, false);
        };
        let name = &after[..close];
        match params.iter().rfind(|(k, _)| k.as_ref() == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str(&rest[open..=open + close + 1]);
                complete = false;
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    (out, complete)
}

fn child_segment<'a>(candidate: &'a str, current_uri: &str) -> Option<&'a str> {
    let base = current_uri.trim_end_matches('/');
    let rest = candidate.strip_prefix(base)?.strip_prefix('/')?;
    (!rest.is_empty() && !rest.contains('/')).then_some(rest)
}

/// Derive parent and child links for `current_uri`.
#[must_use]
pub fn derive_links(routes: &RouteTable, current_uri: &str, params: &ParamVec) -> DerivedLinks {
    let parent = parent_uri(current_uri);
    let mut links = DerivedLinks::default();

    for route in routes.iter() {
        let (candidate, complete) = substitute(route.template(), params);
        if !complete || candidate == current_uri {
            continue;
        }

        if parent.as_deref() == Some(candidate.as_str()) {
            links.parents.push(LinkEntry::parent(candidate.as_str()));
        }
        if let Some(segment) = child_segment(&candidate, current_uri) {
            links.children.push(LinkEntry::child(segment, candidate.as_str()));
        }
    }

    debug!(
        uri = %current_uri,
        parents = links.parents.len(),
        children = links.children.len(),
        "Links derived from route table"
    );
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Rel;
    use crate::router::LoadPolicy;
    use std::sync::Arc;

    fn table(spec: &str) -> RouteTable {
        RouteTable::parse(spec, LoadPolicy::Strict).unwrap().table
    }

    fn params(pairs: &[(&str, &str)]) -> ParamVec {
        pairs
            .iter()
            .map(|(k, v)| (Arc::from(*k), v.to_string()))
            .collect()
    }

    const LIBRARY: &str = "/ - Root\n\
        /books - BooksCollection\n\
        /books/{book_id} - Book\n\
        /books/{book_id}/reviews - ReviewsCollection\n\
        /books/{book_id}/reviews/{review_id} - Review\n\
        /authors - AuthorsCollection";

    #[test]
    fn test_parent_uri() {
        assert_eq!(parent_uri("/books/7").as_deref(), Some("/books"));
        assert_eq!(parent_uri("/books").as_deref(), Some("/"));
        assert_eq!(parent_uri("/"), None);
        assert_eq!(parent_uri("/books/").as_deref(), Some("/books"));
    }

    #[test]
    fn test_resolve_template() {
        let p = params(&[("book_id", "7")]);
        assert_eq!(resolve_template("/books/{book_id}/reviews", &p), "/books/7/reviews");
        assert_eq!(
            resolve_template("/books/{book_id}/reviews/{review_id}", &p),
            "/books/7/reviews/{review_id}"
        );
    }

    #[test]
    fn test_values_are_not_substituted_twice() {
        let p = params(&[("x", "{y}"), ("y", "q")]);
        assert_eq!(resolve_template("/a/{x}/{y}", &p), "/a/{y}/q");
        assert_eq!(resolve_template("/a/{y}/{x}", &p), "/a/q/{y}");
        assert_eq!(substitute("/a/{x}", &p), ("/a/{y}".to_string(), true));
        assert_eq!(substitute("/a/{z}", &p), ("/a/{z}".to_string(), false));
    }

    #[test]
    fn test_braced_value_still_yields_child() {
        let t = table("/a/{x} - A\n/a/{x}/q - Q");
        let links = derive_links(&t, "/a/{y}", &params(&[("x", "{y}")]));
        assert_eq!(links.children.len(), 1);
        assert_eq!(links.children[0].href, "/a/{y}/q");
    }

    #[test]
    fn test_parent_link() {
        let t = table("/books - A\n/books/{id} - B");
        let links = derive_links(&t, "/books/7", &params(&[("id", "7")]));
        assert_eq!(links.parents, vec![LinkEntry::parent("/books")]);
        assert!(links.children.is_empty());
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_child() {
        let t = table("/books - A\n/books/{id} - B");
        let links = derive_links(&t, "/books", &ParamVec::new());
        assert!(links.children.is_empty());
        assert!(links.parents.is_empty());
    }

    #[test]
    fn test_root_children() {
        let links = derive_links(&table(LIBRARY), "/", &ParamVec::new());
        assert!(links.parents.is_empty());
        let hrefs: Vec<_> = links.children.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/books", "/authors"]);
        assert_eq!(links.children[0].title, "books");
        assert_eq!(links.children[0].rel, Rel::Child);
    }

    #[test]
    fn test_book_links() {
        let links = derive_links(&table(LIBRARY), "/books/57", &params(&[("book_id", "57")]));
        assert_eq!(links.parents.len(), 1);
        assert_eq!(links.parents[0].href, "/books");
        assert_eq!(links.parents[0].title, "/books");
        assert_eq!(links.children.len(), 1);
        assert_eq!(links.children[0].href, "/books/57/reviews");
        assert_eq!(links.children[0].title, "reviews");
        assert_eq!(links.children[0].method, "OPTIONS");
    }

    #[test]
    fn test_review_links() {
        let links = derive_links(
            &table(LIBRARY),
            "/books/57/reviews/12",
            &params(&[("book_id", "57"), ("review_id", "12")]),
        );
        assert_eq!(links.parents[0].href, "/books/57/reviews");
        assert!(links.children.is_empty());
    }

    #[test]
    fn test_trailing_slash_on_current_uri() {
        let t = table("/books - A\n/books/all - B");
        let links = derive_links(&t, "/books/", &ParamVec::new());
        assert_eq!(links.children.len(), 1);
        assert_eq!(links.children[0].title, "all");
    }

    #[test]
    fn test_empty_table() {
        let links = derive_links(&RouteTable::default(), "/books", &ParamVec::new());
        assert_eq!(links, DerivedLinks::default());
    }
}
