#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::missing_errors_doc)]

//! HTTP client for JSON:API resource servers.
//!
//! Layout:
//! - `transport.rs`: `ApiClient`, URL construction, response classification
//! - `query.rs`: `ListOptions` and the list query-string encoding
//! - `resources.rs`: create/read/update/delete/list
//! - `relationships.rs`: relationship sub-resource operations
//! - `permissions.rs`: permission bitmask read/modify/write
//! - `schema.rs`: entity-model introspection and actions
//! - `error.rs`: `ClientError`
//!
//! Every operation issues its requests sequentially and surfaces failures as
//! they happen. Nothing is retried.

pub mod error;
mod permissions;
pub mod query;
mod relationships;
mod resources;
mod schema;
pub mod transport;

pub use error::{ClientError, ClientResult};
pub use query::ListOptions;
pub use transport::{ApiClient, HEADER_REQUEST_ID};
