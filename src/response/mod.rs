//! # Response Module
//!
//! Handlers build their response by mutating a [`ResponseState`]:
//!
//! - [`ResponseState::add_data`] shallow-merges fields into the body
//! - [`ResponseState::set_title`], [`ResponseState::set_description`] and
//!   [`ResponseState::add_link`] fill the hypermedia block and switch it on
//! - [`ResponseState::set_status`] / [`ResponseState::hyper_status`] set the code
//!
//! [`ResponseState::finalize`] renders the status line and the JSON body. When
//! hypermedia was never switched on, the body holds only the data fields:
//!
//! ```json
//! { "id": "57", "title": "Pride and Prejudice" }
//! ```
//!
//! Otherwise the block is merged in under the `hypermedia` key:
//!
//! ```json
//! {
//!   "hypermedia": {
//!     "title": "Books Collection",
//!     "links": [{ "title": "/", "href": "/", "rel": "parent", "method": "OPTIONS" }]
//!   }
//! }
//! ```

mod link;
mod state;
mod status;

pub use link::{LinkEntry, Rel, UNTITLED_LINK};
pub use state::{Finalized, ResponseState, CONTENT_TYPE, HYPERMEDIA_KEY};
pub use status::{reason_phrase, status_line};
