//! Error taxonomy for client operations.

use std::fmt::Write as _;

use apictl_models::{ErrorObject, ModelError};
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Raw bodies quoted in error messages are cut to this many characters.
pub const BODY_EXCERPT_CHARS: usize = 200;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by [`ApiClient`](crate::ApiClient) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, DNS, TLS, or timeout failure before a response arrived.
    #[error("{method} {url} failed")]
    Transport {
        /// Request method.
        method: Method,
        /// Request URL.
        url: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The server answered 404.
    #[error("resource not found at {url}{}", render_errors(.errors))]
    NotFound {
        /// Request URL.
        url: String,
        /// Decoded JSON:API error objects, possibly empty.
        errors: Vec<ErrorObject>,
    },
    /// The server answered with a non-2xx status other than 404.
    #[error("server returned {status} for {url}{}", render_status_detail(.errors, .body))]
    Status {
        /// Response status.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Decoded JSON:API error objects, possibly empty.
        errors: Vec<ErrorObject>,
        /// Response body excerpt, used when no error objects were decoded.
        body: String,
    },
    /// A 2xx response body was not the expected JSON.
    #[error("failed to decode {context}: {source} (body: {body})")]
    Decode {
        /// What was being decoded.
        context: String,
        /// Response body excerpt.
        body: String,
        /// Decoder error.
        source: serde_json::Error,
    },
    /// An operation that addresses a single resource was given an empty id.
    #[error("an id is required to address a '{resource_type}' resource")]
    MissingId {
        /// Type of the resource that lacked an id.
        resource_type: String,
    },
    /// Locally detected invalid input; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// Payload-level failure such as an unknown permission name.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ClientError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the failure was detected before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingId { .. }
                | Self::Validation(_)
                | Self::Model(ModelError::UnknownPermission { .. })
        )
    }

    /// Error objects decoded from the server response, if any.
    #[must_use]
    pub fn error_objects(&self) -> &[ErrorObject] {
        match self {
            Self::NotFound { errors, .. } | Self::Status { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Cut `body` to [`BODY_EXCERPT_CHARS`] characters, marking the cut with `...`.
#[must_use]
pub fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

fn render_errors(errors: &[ErrorObject]) -> String {
    let mut rendered = String::new();
    for error in errors {
        let _ = write!(rendered, "\n  - {error}");
    }
    rendered
}

fn render_status_detail(errors: &[ErrorObject], body: &str) -> String {
    if !errors.is_empty() {
        render_errors(errors)
    } else if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}
