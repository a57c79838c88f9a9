use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// Relationship between the current resource and a link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rel {
    Parent,
    Child,
    Item,
    /// The current resource itself (`"self"` on the wire)
    SelfRef,
    None,
    /// Any other relation name
    Other(String),
}

impl Rel {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Rel::Parent => "parent",
            Rel::Child => "child",
            Rel::Item => "item",
            Rel::SelfRef => "self",
            Rel::None => "none",
            Rel::Other(name) => name,
        }
    }
}

impl From<&str> for Rel {
    fn from(s: &str) -> Self {
        match s {
            "parent" => Rel::Parent,
            "child" => Rel::Child,
            "item" => Rel::Item,
            "self" => Rel::SelfRef,
            "none" | "" => Rel::None,
            other => Rel::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A navigational link in the hypermedia block.
///
/// `method` names the HTTP method a client should use to follow the link and
/// defaults to `OPTIONS`, the discovery method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub title: String,
    pub href: String,
    pub rel: Rel,
    pub method: String,
}

/// Title used for links added without one.
pub const UNTITLED_LINK: &str = "(untitled link)";

impl LinkEntry {
    /// A link followed with `OPTIONS`.
    #[must_use]
    pub fn new(title: impl Into<String>, href: impl Into<String>, rel: Rel) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            rel,
            method: "OPTIONS".to_string(),
        }
    }

    #[must_use]
    pub fn parent(href: impl Into<String>) -> Self {
        let href = href.into();
        Self::new(href.clone(), href, Rel::Parent)
    }

    #[must_use]
    pub fn child(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(title, href, Rel::Child)
    }

    #[must_use]
    pub fn item(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(title, href, Rel::Item)
    }

    /// Override the method used to follow this link.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub(crate) fn to_value(&self) -> Value {
        json!({
            "title": self.title,
            "href": self.href,
            "rel": self.rel.as_str(),
            "method": self.method,
        })
    }
}

impl Default for LinkEntry {
    fn default() -> Self {
        Self::new(UNTITLED_LINK, "", Rel::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_defaults_to_options() {
        assert_eq!(LinkEntry::item("Emma", "/books/1").method, "OPTIONS");
        assert_eq!(
            LinkEntry::item("Emma", "/books/1").with_method("GET").method,
            "GET"
        );
    }

    #[test]
    fn test_rel_names() {
        assert_eq!(Rel::SelfRef.as_str(), "self");
        assert_eq!(Rel::from("self"), Rel::SelfRef);
        assert_eq!(Rel::from("related"), Rel::Other("related".into()));
        assert_eq!(Rel::from("related").to_string(), "related");
    }

    #[test]
    fn test_serialize() {
        let link = LinkEntry::parent("/books");
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({"title": "/books", "href": "/books", "rel": "parent", "method": "OPTIONS"})
        );
        assert_eq!(serde_json::to_value(&link).unwrap(), link.to_value());
    }
}
