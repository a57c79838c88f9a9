//! # Resource Module
//!
//! A resource is the unit that implements zero or more HTTP method operations
//! for a matched route. Each resource kind declares its operations in an
//! explicit table ([`Resource::OPERATIONS`]) keyed by [`Operation`]; nothing is
//! looked up by method name at runtime.
//!
//! ## Lifecycle
//!
//! 1. [`Resource::construct`] builds the instance for one request. It may
//!    refuse by returning [`Construction::Halted`] after recording a response
//!    (typically a 404 for a missing entity).
//! 2. The dispatcher looks up the request method in the operation table and
//!    invokes the matching [`OperationFn`].
//!
//! `OPTIONS` is always available: unless a kind overrides it, [`default_options`]
//! describes the resource and its links.
//!
//! ## Example
//!
//! ```rust
//! use hmrouter::context::RequestContext;
//! use hmrouter::resource::{Construction, Operation, OperationFn, Resource};
//! use hmrouter::response::ResponseState;
//!
//! struct Authors;
//!
//! impl Authors {
//!     fn get(&self, _ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
//!         res.insert("authors_list", vec!["Jane Austen"]);
//!         Ok(())
//!     }
//! }
//!
//! impl Resource for Authors {
//!     const TITLE: &'static str = "Authors";
//!     const OPERATIONS: &'static [(Operation, OperationFn<Self>)] = &[(Operation::Get, Self::get)];
//!
//!     fn construct(_ctx: &RequestContext, _res: &mut ResponseState) -> Construction<Self> {
//!         Construction::Ready(Authors)
//!     }
//! }
//! ```

use crate::context::RequestContext;
use crate::hypermedia::derive_links;
use crate::response::{LinkEntry, Rel, ResponseState};
use http::Method;
use std::fmt;

/// The HTTP methods a resource can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Options,
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Head,
}

impl Operation {
    /// All operations, in the order self links are listed.
    pub const ALL: [Operation; 7] = [
        Operation::Options,
        Operation::Get,
        Operation::Put,
        Operation::Post,
        Operation::Delete,
        Operation::Patch,
        Operation::Head,
    ];

    /// The operation for an HTTP method, or `None` for methods outside the
    /// capability set (e.g. `TRACE`).
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::OPTIONS => Some(Operation::Options),
            Method::GET => Some(Operation::Get),
            Method::PUT => Some(Operation::Put),
            Method::POST => Some(Operation::Post),
            Method::DELETE => Some(Operation::Delete),
            Method::PATCH => Some(Operation::Patch),
            Method::HEAD => Some(Operation::Head),
            _ => None,
        }
    }

    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Operation::Options => Method::OPTIONS,
            Operation::Get => Method::GET,
            Operation::Put => Method::PUT,
            Operation::Post => Method::POST,
            Operation::Delete => Method::DELETE,
            Operation::Patch => Method::PATCH,
            Operation::Head => Method::HEAD,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Options => "OPTIONS",
            Operation::Get => "GET",
            Operation::Put => "PUT",
            Operation::Post => "POST",
            Operation::Delete => "DELETE",
            Operation::Patch => "PATCH",
            Operation::Head => "HEAD",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation implementation on resource kind `R`.
pub type OperationFn<R> = fn(&R, &RequestContext, &mut ResponseState) -> anyhow::Result<()>;

/// Result of constructing a resource for one request.
pub enum Construction<R> {
    /// The resource is ready to handle the request.
    Ready(R),
    /// Dispatch stops here; the response recorded so far is sent as-is.
    Halted,
}

impl<R> fmt::Debug for Construction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construction::Ready(_) => f.write_str("Ready(..)"),
            Construction::Halted => f.write_str("Halted"),
        }
    }
}

/// A resource kind.
pub trait Resource: Sized + Send + 'static {
    /// Title reported by the default `OPTIONS` operation.
    const TITLE: &'static str = "";
    /// Description reported by the default `OPTIONS` operation.
    const DESCRIPTION: &'static str = "";
    /// The operations this kind implements. Listing [`Operation::Options`]
    /// replaces [`default_options`].
    const OPERATIONS: &'static [(Operation, OperationFn<Self>)];

    /// Build the resource for one request.
    fn construct(ctx: &RequestContext, res: &mut ResponseState) -> Construction<Self>;
}

/// Operations implemented by `R`, including `OPTIONS`, in [`Operation::ALL`] order.
#[must_use]
pub fn capabilities<R: Resource>() -> Vec<Operation> {
    Operation::ALL
        .into_iter()
        .filter(|op| *op == Operation::Options || R::OPERATIONS.iter().any(|(o, _)| o == op))
        .collect()
}

/// The default `OPTIONS` operation.
///
/// Fills the title and description from the kind's metadata, adds the parent
/// and child links derived from the route table, then one `self` link per
/// implemented method.
///
/// Overrides typically call this first and adjust the result:
///
/// ```rust,ignore
/// fn options(&self, ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
///     default_options(self, ctx, res)?;
///     res.set_title(&self.book.title);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// Never fails; the signature matches [`OperationFn`].
pub fn default_options<R: Resource>(
    _resource: &R,
    ctx: &RequestContext,
    res: &mut ResponseState,
) -> anyhow::Result<()> {
    res.set_title(R::TITLE);
    res.set_description(R::DESCRIPTION);

    let derived = derive_links(ctx.routes(), ctx.uri(), ctx.params());
    for link in derived.parents.into_iter().chain(derived.children) {
        res.add_link(link);
    }

    for op in capabilities::<R>() {
        res.add_link(
            LinkEntry::new(format!("Self {op}"), ctx.uri(), Rel::SelfRef).with_method(op.as_str()),
        );
    }
    Ok(())
}
