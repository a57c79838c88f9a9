//! # Router Module
//!
//! The router turns declarative path templates into parameter bindings.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing the line-oriented route specification into an ordered table
//! - Compiling each template (e.g. `/books/{book_id}`) into an anchored pattern
//! - Matching incoming URIs against the table, first match wins
//! - Extracting named path parameters from the matched URI
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: At startup, every template is compiled. Malformed templates
//!    (unbalanced braces, invalid or duplicate placeholder names) are configuration
//!    errors surfaced here, never at request time.
//!
//! 2. **Matching**: For each request the URI is tested against the compiled
//!    patterns in declaration order. A trailing query string is tolerated and
//!    ignored.
//!
//! ## Example
//!
//! ```rust
//! use hmrouter::router::{LoadPolicy, RouteTable, Router};
//!
//! let loaded = RouteTable::parse(
//!     "/books - BooksCollection\n/books/{book_id} - Book",
//!     LoadPolicy::Strict,
//! )
//! .unwrap();
//! let router = Router::new(loaded.table);
//!
//! let m = router.route("/books/57?fields=title").unwrap();
//! assert_eq!(m.handler_name(), "Book");
//! assert_eq!(m.get_path_param("book_id"), Some("57"));
//! ```

mod core;
mod pattern;
mod table;
#[cfg(test)]
mod tests;

pub use core::{strip_base_path, ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use pattern::CompiledPattern;
pub use table::{LoadPolicy, LoadedRoutes, RouteTable, RouteTableBuilder, RouteTemplate};
