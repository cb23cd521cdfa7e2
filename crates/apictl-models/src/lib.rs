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
//! Wire-level types shared by the apictl client and CLI.
//!
//! Layout: `document.rs` (JSON:API resources, relationships, and top-level
//! documents), `permission.rs` (the bitmask permission codec), `schema.rs`
//! (entity-model introspection payloads), `error.rs` (`ModelError`).
//!
//! Nothing in this crate performs I/O; the types only describe the contract and
//! the lossless (de)serialisation rules the server depends on.

pub mod document;
pub mod error;
pub mod permission;
pub mod schema;

pub use document::{
    Document, ErrorObject, ErrorSource, ErrorStatus, JsonApiObject, Linkage, MEDIA_TYPE, Object,
    PrimaryData, Relationship, RelationshipDocument, Resource, ResourceIdentifier,
};
pub use error::{ModelError, ModelResult};
pub use permission::{AuthPermission, PERMISSION_NAMES, PermissionOp};
pub use schema::{Action, ActionOutcome, ColumnInfo, ForeignKeyData, TableInfo};
