//! Error types shared across the router, the dispatcher and the response builder.
//!
//! Two families exist:
//!
//! - [`RouteSpecError`] - configuration errors raised while the route table is
//!   loaded and compiled at startup. They never occur at request time.
//! - [`DispatchError`] - the request-level failures. Each one is terminal for the
//!   request and renders as exactly one response (see [`DispatchError::status`]).

use crate::payload::ParseStatus;
use http::Method;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing a route specification or compiling its templates.
#[derive(Debug, Error)]
pub enum RouteSpecError {
    /// A line did not match `<uri> - <handler>`.
    #[error("bad line {line} in the routing table: '{text}'")]
    MalformedLine { line: usize, text: String },

    /// A `{` without a matching `}` (or the reverse).
    #[error("unbalanced braces in route template '{template}'")]
    UnbalancedBraces { template: String },

    /// A placeholder whose name is not an identifier (`[A-Za-z_]\w*`).
    #[error("invalid placeholder '{{{name}}}' in route template '{template}'")]
    InvalidPlaceholder { template: String, name: String },

    /// The same placeholder appears twice in one template.
    #[error("placeholder '{{{name}}}' appears more than once in route template '{template}'")]
    DuplicatePlaceholder { template: String, name: String },

    /// The generated pattern was rejected by the regex engine.
    #[error("route template '{template}' did not compile: {source}")]
    Pattern {
        template: String,
        #[source]
        source: regex::Error,
    },

    /// The route file could not be read.
    #[error("failed to read route file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Request-level failures produced by the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No template in the route table matched the URI.
    #[error("There is no resource at '{uri}'.")]
    RouteNotFound { uri: String },

    /// The route matched but the handler kind does not implement the method.
    #[error(
        "The {method} method is not supported by this resource. Try an OPTIONS request for a list of supported methods."
    )]
    MethodNotAllowed { method: Method },

    /// The handler identifier did not resolve to a registered handler kind.
    #[error("Could not resolve resource at '{uri}'.")]
    HandlerResolutionFailure { uri: String, handler: String },

    /// The request body of a mutating method could not be decoded.
    #[error("There was an error parsing the expected JSON Data: {}", .status.as_str())]
    PayloadDecodeFailure { status: ParseStatus },

    /// The handler operation itself returned an error.
    #[error("The {method} operation failed.")]
    OperationFailed {
        method: Method,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// HTTP status code this error is surfaced as.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::RouteNotFound { .. } => 404,
            DispatchError::MethodNotAllowed { .. } => 405,
            DispatchError::HandlerResolutionFailure { .. } => 500,
            DispatchError::PayloadDecodeFailure { .. } => 400,
            DispatchError::OperationFailed { .. } => 500,
        }
    }
}

/// Errors raised by [`crate::response::ResponseState`] mutators.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// `add_data` only merges JSON objects.
    #[error("response data must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    /// The value could not be converted into JSON.
    #[error("response data could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}
