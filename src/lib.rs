//! # hmrouter
//!
//! **hmrouter** is a minimal hypermedia request router. It maps an HTTP request
//! (method + URI) to a resource, invokes the matching operation and assembles a
//! JSON response that can carry discoverable hypermedia: a title, a description
//! and typed links to parent, child and self resources.
//!
//! ## Architecture
//!
//! - **[`router`]** - Route table loading, template compilation and first-match URI matching
//! - **[`resource`]** - The `Resource` trait and its explicit operation table
//! - **[`registry`]** - Handler identifier → resource kind mapping
//! - **[`dispatcher`]** - The per-request state machine producing exactly one response
//! - **[`response`]** - Response builder, links and status line rendering
//! - **[`hypermedia`]** - Parent/child link inference from the route table
//! - **[`payload`]** - Request body decoding with a fixed error taxonomy
//! - **[`server`]** - HTTP transport built on `may_minihttp`
//! - **[`demo`]** - The Library demo API
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as server::AppService
//!     participant Dispatcher
//!     participant Router
//!     participant Registry
//!     participant Resource
//!
//!     Client->>Server: OPTIONS /books/57
//!     Server->>Dispatcher: handle(InboundRequest)
//!     Dispatcher->>Router: route("/books/57")
//!     Router-->>Dispatcher: Book {book_id: "57"}
//!     Dispatcher->>Registry: resolve("Book")
//!     Dispatcher->>Resource: construct(ctx, res)
//!     Dispatcher->>Resource: options(ctx, res)
//!     Resource-->>Dispatcher: title, description, links
//!     Dispatcher-->>Server: Finalized (200 OK, JSON)
//!     Server-->>Client: response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hmrouter::dispatcher::InboundRequest;
//! use http::Method;
//!
//! let dispatcher = hmrouter::demo::dispatcher("").unwrap();
//! let out = dispatcher.handle(&InboundRequest::new(Method::OPTIONS, "/books", Vec::new()));
//! assert_eq!(out.response.status, 200);
//! assert!(out.response.body.contains("\"hypermedia\""));
//! ```
//!
//! ## Configuration
//!
//! See [`runtime_config`] (`HMR_STACK_SIZE`, `HMR_BASE_PATH`,
//! `HMR_ROUTE_POLICY`) and [`logging`] (`HMR_LOG_*`).

pub mod cli;
pub mod context;
pub mod demo;
pub mod dispatcher;
pub mod error;
pub mod hypermedia;
pub mod logging;
pub mod payload;
pub mod registry;
pub mod resource;
pub mod response;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::RequestContext;
pub use dispatcher::{Dispatched, Dispatcher, Disposition, InboundRequest};
pub use error::{DispatchError, ResponseError, RouteSpecError};
pub use registry::HandlerRegistry;
pub use resource::{Construction, Operation, OperationFn, Resource};
pub use response::{LinkEntry, Rel, ResponseState};
pub use router::{LoadPolicy, RouteTable, Router};
