//! # CLI Module
//!
//! ### `serve`
//!
//! Serve the Library demo API:
//!
//! ```bash
//! hmrouter serve --addr 127.0.0.1:8080 --base-path /api
//! ```
//!
//! A custom route file may be passed with `--routes`; its handler identifiers
//! must name demo resources, otherwise those routes answer with a 500.
//!
//! ### `routes`
//!
//! ```bash
//! hmrouter routes --file routes.txt
//! ```
//!
//! ### `match`
//!
//! ```bash
//! hmrouter match /books/57/reviews/12
//! ```
//!
//! prints
//!
//! ```json
//! {
//!   "handler": "Review",
//!   "params": { "book_id": "57", "review_id": "12" },
//!   "template": "/books/{book_id}/reviews/{review_id}",
//!   "uri": "/books/57/reviews/12"
//! }
//! ```

mod commands;


pub use commands::{describe_match, describe_routes, load_routes, run_cli, Cli, Commands};
