//! Route table construction and the line-oriented route specification loader.
//!
//! A route specification is plain text, one route per line:
//!
//! ```text
//! / - Root
//! /books - BooksCollection
//! /books/{book_id} - Book
//! ```
//!
//! Order is significant: the matcher tries templates in declaration order and
//! the first structural match wins.
//!
//! Loading is two-phase. A [`RouteTableBuilder`] collects and compiles templates
//! and is consumed once to produce an immutable [`RouteTable`], which can then
//! be shared freely between concurrent requests.

use super::pattern::CompiledPattern;
use crate::error::RouteSpecError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// `<uri> - <handler>` with whitespace-free tokens.
#[allow(clippy::expect_used)]
static ROUTE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+) - (\S+)$").expect("route line regex is valid"));

/// How the loader reacts to a line it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// The first bad line aborts loading.
    #[default]
    Strict,
    /// Bad lines are skipped and reported as diagnostics.
    Lenient,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(LoadPolicy::Strict),
            "lenient" => Ok(LoadPolicy::Lenient),
            other => Err(format!("unknown route policy '{other}'")),
        }
    }
}

/// One entry of the route table: a compiled template bound to a handler identifier.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    pattern: CompiledPattern,
    handler: Arc<str>,
}

impl RouteTemplate {
    /// Compile `template` and bind it to `handler`.
    ///
    /// # Errors
    ///
    /// Returns the compile error for malformed templates.
    pub fn new(template: &str, handler: &str) -> Result<Self, RouteSpecError> {
        Ok(Self {
            pattern: CompiledPattern::compile(template)?,
            handler: Arc::from(handler),
        })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }
}

/// Collects route templates before the table is frozen.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Arc<RouteTemplate>>,
}

impl RouteTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Later routes have lower precedence.
    ///
    /// # Errors
    ///
    /// Returns the compile error for malformed templates.
    pub fn route(&mut self, template: &str, handler: &str) -> Result<&mut Self, RouteSpecError> {
        self.routes
            .push(Arc::new(RouteTemplate::new(template, handler)?));
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the collected routes.
    #[must_use]
    pub fn build(self) -> RouteTable {
        let summary: Vec<String> = self
            .routes
            .iter()
            .take(10)
            .map(|r| format!("{} -> {}", r.template(), r.handler()))
            .collect();
        info!(
            routes_count = self.routes.len(),
            routes_summary = ?summary,
            "Route table loaded"
        );
        RouteTable {
            routes: self.routes.into(),
        }
    }
}

/// An immutable, ordered route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Arc<[Arc<RouteTemplate>]>,
}

/// A route table together with the lines skipped in lenient mode.
#[derive(Debug)]
pub struct LoadedRoutes {
    pub table: RouteTable,
    pub diagnostics: Vec<RouteSpecError>,
}

impl RouteTable {
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// Parse a route specification.
    ///
    /// Lines are split on `\n` or `\r\n`; blank lines are ignored and each
    /// remaining line is trimmed before matching `<uri> - <handler>`.
    ///
    /// # Errors
    ///
    /// In [`LoadPolicy::Strict`] mode, the first malformed line or template is
    /// returned as an error. [`LoadPolicy::Lenient`] never fails; problems are
    /// collected in [`LoadedRoutes::diagnostics`].
    pub fn parse(spec: &str, policy: LoadPolicy) -> Result<LoadedRoutes, RouteSpecError> {
        let mut builder = RouteTableBuilder::new();
        let mut diagnostics = Vec::new();

        for (idx, raw) in spec.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;

            let result = match ROUTE_LINE.captures(line) {
                Some(caps) => builder.route(&caps[1], &caps[2]).map(|_| ()),
                None => Err(RouteSpecError::MalformedLine {
                    line: line_no,
                    text: line.to_string(),
                }),
            };

            if let Err(err) = result {
                match policy {
                    LoadPolicy::Strict => return Err(err),
                    LoadPolicy::Lenient => {
                        warn!(line = line_no, error = %err, "Skipping route specification line");
                        diagnostics.push(err);
                    }
                }
            }
        }

        Ok(LoadedRoutes {
            table: builder.build(),
            diagnostics,
        })
    }

    /// Read and parse a route specification file.
    ///
    /// # Errors
    ///
    /// Returns [`RouteSpecError::Io`] when the file cannot be read, otherwise as
    /// [`RouteTable::parse`].
    pub fn load_file(path: &Path, policy: LoadPolicy) -> Result<LoadedRoutes, RouteSpecError> {
        let content = std::fs::read_to_string(path).map_err(|source| RouteSpecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, policy)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteTemplate>> {
        self.routes.iter()
    }

    /// Handler identifier bound to an exact template string.
    #[must_use]
    pub fn handler_for(&self, template: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| r.template() == template)
            .map(|r| r.handler())
    }
}
