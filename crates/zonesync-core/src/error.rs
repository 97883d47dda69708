//! Error types for the zonesync system
//!
//! One taxonomy covers every crate: the store adapter, the address source,
//! the lookup channel, and the engines all speak [`Error`]. What is fatal and
//! what is merely reported is decided by the flow, not by the error type —
//! a `RemoteRejected` aborts the ACME flow but only skips one record in a
//! dynamic DNS cycle.

use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the zonesync system
#[derive(Error, Debug)]
pub enum Error {
    /// Network- or HTTP-level failure talking to the store, the address
    /// service, or the lookup channel
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed response body; fatal for the call it affects
    #[error("malformed response: {0}")]
    Decode(String),

    /// An exact filter did not resolve to exactly one record
    #[error("filter [{filter}] matched {found} record(s), expected exactly one")]
    AmbiguousOrMissing {
        /// Rendered filter that produced the wrong cardinality
        filter: String,
        /// Number of records the store returned
        found: usize,
    },

    /// The store returned a non-success status for an update
    #[error("remote store rejected update (status {status}): {detail}")]
    RemoteRejected {
        /// HTTP status code returned by the store
        status: u16,
        /// Response body, as far as it could be read
        detail: String,
    },

    /// An address family selector outside the supported set
    #[error("unsupported address family: {0:?}")]
    UnsupportedFamily(String),

    /// Configuration errors; fatal at startup, never retried
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
