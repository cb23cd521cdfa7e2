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

//! File-backed configuration for the apictl client.
//!
//! Layout: `model.rs` (on-disk file and resolved client configuration),
//! `loader.rs` (path discovery, load/save helpers), `defaults.rs` (shared
//! constants), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;

pub use defaults::{DEFAULT_API_PREFIX, DEFAULT_TIMEOUT_SECS};
pub use error::{ConfigError, ConfigResult};
pub use loader::{default_config_path, load, load_optional, save};
pub use model::{ClientConfig, ConfigFile, ConfigOverrides};
