//! Error types for model decoding and permission parsing.

use thiserror::Error;

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while interpreting wire payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A permission name did not match any entry in the permission table.
    #[error("unknown permission name: {name}")]
    UnknownPermission {
        /// Offending token exactly as supplied (after trimming).
        name: String,
    },
    /// The server returned a `permission` attribute that is not a non-negative integer.
    #[error("invalid permission value: {value}")]
    InvalidPermissionValue {
        /// Rendered form of the rejected value.
        value: String,
    },
    /// Primary data did not have the shape the caller required.
    #[error("expected {expected} in document data, found {found}")]
    UnexpectedData {
        /// Shape the caller asked for.
        expected: &'static str,
        /// Shape that was actually present.
        found: &'static str,
    },
    /// An action definition could not be decoded.
    #[error("invalid action definition '{name}': {reason}")]
    InvalidAction {
        /// Action name or resource id used to locate the definition.
        name: String,
        /// Decoder message.
        reason: String,
    },
}
