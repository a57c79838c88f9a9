//! # Dispatcher Module
//!
//! Takes a request from raw path to finalized response. Every request ends in
//! exactly one [`Disposition`]:
//!
//! ```text
//! strip base path ─▶ match route ──none──▶ NoRoute (404)
//!                        │
//!                 resolve handler ──missing──▶ Unresolved (500)
//!                        │
//!           decode body, build context
//!                        │
//!                construct resource ──halt──▶ Halted (resource's own response)
//!                        │
//!               look up operation ──absent──▶ MethodNotAllowed (405)
//!                        │
//!     mutating method with bad body ──▶ BadPayload (400, `json_error` field)
//!                        │
//!                 invoke operation ──error/panic──▶ OperationFailed (500)
//!                        │
//!                     Invoked
//! ```
//!
//! The method check runs before the payload check, so a `POST` with a broken
//! body to a resource without `post` is a 405. An empty body never fails.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(router, registry);
//! let out = dispatcher.handle(&InboundRequest::new(Method::GET, "/books", Vec::new()));
//! assert_eq!(out.response.status, 200);
//! ```

mod core;

pub use core::{Dispatched, Dispatcher, Disposition, InboundRequest, JSON_ERROR_KEY};
