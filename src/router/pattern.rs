//! Route template compilation.
//!
//! A template such as `/books/{book_id}/reviews` is turned into an anchored regex
//! where every `{name}` placeholder becomes a named group matching one or more
//! characters other than `/` (and `?`, which starts the query). Everything else is matched literally, and an
//! optional trailing query string (`?...`) is tolerated but never captured.

use super::core::ParamVec;
use crate::error::RouteSpecError;
use regex::Regex;
use std::sync::Arc;

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    regex: Regex,
    /// Placeholder names in declaration order
    param_names: Vec<Arc<str>>,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl CompiledPattern {
    /// Compile a route template.
    ///
    /// # Errors
    ///
    /// - [`RouteSpecError::UnbalancedBraces`] for a stray `{` or `}`
    /// - [`RouteSpecError::InvalidPlaceholder`] for names outside `[A-Za-z_]\w*`
    /// - [`RouteSpecError::DuplicatePlaceholder`] when a name repeats
    pub fn compile(template: &str) -> Result<Self, RouteSpecError> {
        let mut pattern = String::with_capacity(template.len() + 16);
        pattern.push('^');
        let mut param_names: Vec<Arc<str>> = Vec::with_capacity(template.matches('{').count());

        let mut rest = template;
        while let Some(open) = rest.find(['{', '}']) {
            if rest.as_bytes()[open] == b'}' {
                return Err(RouteSpecError::UnbalancedBraces {
                    template: template.to_string(),
                });
            }
            pattern.push_str(&regex::escape(&rest[..open]));

            let after = &rest[open + 1..];
            let close = match after.find(['{', '}']) {
                Some(i) if after.as_bytes()[i] == b'}' => i,
                _ => {
                    return Err(RouteSpecError::UnbalancedBraces {
                        template: template.to_string(),
                    })
                }
            };

            let name = &after[..close];
            if !is_identifier(name) {
                return Err(RouteSpecError::InvalidPlaceholder {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }
            if param_names.iter().any(|p| p.as_ref() == name) {
                return Err(RouteSpecError::DuplicatePlaceholder {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }

            pattern.push_str("(?P<");
            pattern.push_str(name);
            pattern.push_str(">[^/?]+)");
            param_names.push(Arc::from(name));

            rest = &after[close + 1..];
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push_str(r"(?:\?.*)?$");

        let regex = Regex::new(&pattern).map_err(|source| RouteSpecError::Pattern {
            template: template.to_string(),
            source,
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
        })
    }

    /// The original template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in the order they appear.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Whether `uri` matches this template.
    #[must_use]
    pub fn is_match(&self, uri: &str) -> bool {
        self.regex.is_match(uri)
    }

    /// Match `uri` and extract the named parameters.
    ///
    /// Only capture groups whose name is an identifier are reported; the
    /// unnamed query-string group never is.
    #[must_use]
    pub fn captures(&self, uri: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(uri)?;
        let params = self
            .regex
            .capture_names()
            .flatten()
            .filter(|name| name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_'))
            .filter_map(|name| {
                let value = caps.name(name)?;
                let key = self
                    .param_names
                    .iter()
                    .find(|p| p.as_ref() == name)
                    .map(Arc::clone)
                    .unwrap_or_else(|| Arc::from(name));
                Some((key, value.as_str().to_string()))
            })
            .collect();
        Some(params)
    }
}
