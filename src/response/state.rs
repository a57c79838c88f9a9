use super::link::{LinkEntry, Rel, UNTITLED_LINK};
use super::status::status_line;
use crate::error::ResponseError;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Key under which the hypermedia block is merged into the response body.
pub const HYPERMEDIA_KEY: &str = "hypermedia";

/// Content type of every response body.
pub const CONTENT_TYPE: &str = "application/json";

/// The response accumulated by a handler over one request.
///
/// Data fields live in a sorted map, so the serialized body does not depend on
/// the order in which handlers wrote them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseState {
    uri: String,
    status: u16,
    data: Map<String, Value>,
    hypermedia: bool,
    title: String,
    description: String,
    links: Vec<LinkEntry>,
}

/// A rendered response, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    pub status: u16,
    /// e.g. `404 Not Found`, or the bare code when no reason phrase is known
    pub status_line: String,
    pub content_type: &'static str,
    pub body: String,
}

impl ResponseState {
    /// A fresh `200` response for the resource at `uri`.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            status: 200,
            data: Map::new(),
            hypermedia: false,
            title: String::new(),
            description: String::new(),
            links: Vec::new(),
        }
    }

    /// URI of the resource this response describes.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Set the status code. Unknown codes are accepted as-is.
    pub fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    /// Set the status code and describe it in the hypermedia block.
    ///
    /// The title becomes the rendered status line.
    pub fn hyper_status(&mut self, code: u16, description: impl Into<String>) {
        self.status = code;
        self.set_title(status_line(code));
        self.set_description(description);
    }

    /// Shallow-merge a JSON object into the data fields; later writes win.
    ///
    /// # Errors
    ///
    /// [`ResponseError::NotAnObject`] if `data` does not serialize to an object.
    pub fn add_data<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<(), ResponseError> {
        match serde_json::to_value(data)? {
            Value::Object(fields) => {
                self.data.extend(fields);
                Ok(())
            }
            other => Err(ResponseError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }

    /// Set a single data field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.hypermedia = true;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.hypermedia = true;
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Append a link. An empty href points at the current resource and an
    /// empty title or method is filled with its default.
    pub fn add_link(&mut self, mut link: LinkEntry) {
        if link.href.is_empty() {
            link.href = self.uri.clone();
        }
        if link.title.is_empty() {
            link.title = UNTITLED_LINK.to_string();
        }
        if link.method.is_empty() {
            link.method = "OPTIONS".to_string();
        }
        self.links.push(link);
        self.hypermedia = true;
    }

    #[must_use]
    pub fn links(&self) -> &[LinkEntry] {
        &self.links
    }

    #[must_use]
    pub fn hypermedia_enabled(&self) -> bool {
        self.hypermedia
    }

    #[must_use]
    pub fn find_link_by_href(&self, href: &str) -> Option<&LinkEntry> {
        self.links.iter().find(|l| l.href == href)
    }

    #[must_use]
    pub fn find_link_by_method(&self, method: &str) -> Option<&LinkEntry> {
        self.links.iter().find(|l| l.method == method)
    }

    /// Links with the given relation, in insertion order.
    pub fn links_with_rel<'a>(&'a self, rel: &'a Rel) -> impl Iterator<Item = &'a LinkEntry> + 'a {
        self.links.iter().filter(move |l| &l.rel == rel)
    }

    /// The hypermedia block, holding whichever of title, description and links
    /// are non-empty.
    #[must_use]
    pub fn hypermedia(&self) -> Map<String, Value> {
        let mut block = Map::new();
        if !self.title.is_empty() {
            block.insert("title".to_string(), Value::String(self.title.clone()));
        }
        if !self.description.is_empty() {
            block.insert(
                "description".to_string(),
                Value::String(self.description.clone()),
            );
        }
        if !self.links.is_empty() {
            block.insert(
                "links".to_string(),
                Value::Array(self.links.iter().map(LinkEntry::to_value).collect()),
            );
        }
        block
    }

    /// The response body: data fields, plus the hypermedia block under
    /// [`HYPERMEDIA_KEY`] when hypermedia is enabled. The block overwrites any
    /// data field of the same name.
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = self.data.clone();
        if self.hypermedia {
            body.insert(HYPERMEDIA_KEY.to_string(), Value::Object(self.hypermedia()));
        }
        Value::Object(body)
    }

    /// Render the status line and JSON body. Does not mutate the state, so
    /// repeated calls produce identical output.
    #[must_use]
    pub fn finalize(&self) -> Finalized {
        let body = self.body().to_string();
        debug!(
            status = self.status,
            hypermedia = self.hypermedia,
            links_count = self.links.len(),
            body_size_bytes = body.len(),
            "Response finalized"
        );
        Finalized {
            status: self.status,
            status_line: status_line(self.status),
            content_type: CONTENT_TYPE,
            body,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
