//! HTTP transport for the dispatcher, built on `may_minihttp` coroutines.
//!
//! ```rust,ignore
//! let service = AppService::new(hmrouter::demo::dispatcher("")?);
//! let handle = HttpServer(service).start("127.0.0.1:8080")?;
//! handle.wait_ready()?;
//! handle.join().ok();
//! ```

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{inbound_from_parts, read_request};
pub use service::AppService;
