//! Router core module - hot path for request routing.
//!
//! Templates are tried in table order and the first structural match wins.
//! There is no specificity scoring: `/books/{id}` declared before `/books/new`
//! captures `id = "new"`.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]

use super::table::{RouteTable, RouteTemplate};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for the hot path.
///
/// Names are shared with the compiled template; values are per-request data
/// from the URI.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a request URI against the route table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched table entry
    pub route: Arc<RouteTemplate>,
    /// Parameters captured from the URI (e.g. `{book_id}` → `"57"`)
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Identifier of the handler bound to the matched template.
    #[must_use]
    pub fn handler_name(&self) -> &str {
        self.route.handler()
    }

    /// Get a path parameter by name.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Matches request URIs against an immutable [`RouteTable`].
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
    /// Prefix removed from incoming paths before matching (e.g. `/api`)
    base_path: String,
}

impl Router {
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            base_path: String::new(),
        }
    }

    /// Set the prefix stripped from incoming paths before matching.
    #[must_use]
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = base_path.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Reduce a raw request path to the API URI by removing the base path.
    #[must_use]
    pub fn api_uri<'a>(&self, raw_path: &'a str) -> Cow<'a, str> {
        strip_base_path(raw_path, &self.base_path)
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!(
            "[routes] base_path={} count={}",
            self.base_path,
            self.table.len()
        );
        for route in self.table.iter() {
            println!("[route] {} -> {}", route.template(), route.handler());
        }
    }

    /// Match a URI (which may carry a query string) against the table.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - the first template that matches
    /// * `None` - no template matches (results in 404)
    #[must_use]
    pub fn route(&self, uri: &str) -> Option<RouteMatch> {
        debug!(uri = %uri, routes_count = self.table.len(), "Route match attempt");

        let match_start = std::time::Instant::now();
        let result = self.table.iter().find_map(|route| {
            route
                .pattern()
                .captures(uri)
                .map(|params| (Arc::clone(route), params))
        });
        let match_duration = match_start.elapsed();

        match result {
            Some((route, path_params)) => {
                info!(
                    uri = %uri,
                    handler_name = %route.handler(),
                    route_pattern = %route.template(),
                    path_params = ?path_params,
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
                Some(RouteMatch { route, path_params })
            }
            None => {
                warn!(
                    uri = %uri,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
                None
            }
        }
    }
}

/// Remove `base_path` from the front of `raw_path`.
///
/// The prefix must end on a segment boundary. An empty remainder becomes `/`
/// and a bare query (`/api?x=1`) becomes `/?x=1`.
#[must_use]
pub fn strip_base_path<'a>(raw_path: &'a str, base_path: &str) -> Cow<'a, str> {
    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        return Cow::Borrowed(if raw_path.is_empty() { "/" } else { raw_path });
    }
    match raw_path.strip_prefix(base) {
        Some("") => Cow::Borrowed("/"),
        Some(rest) if rest.starts_with('/') => Cow::Borrowed(rest),
        Some(rest) if rest.starts_with('?') => Cow::Owned(format!("/{rest}")),
        _ => Cow::Borrowed(raw_path),
    }
}
