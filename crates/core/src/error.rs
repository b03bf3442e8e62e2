//! Error types for the cassia client layer
//!
//! This module defines the single error type used throughout the codec and
//! batch mutation crates. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! - `Decode` / `Encode` / `UnknownType`: codec failures, always local
//! - `Validation`: column input rejected before anything is buffered
//! - `Transport` / `Store`: failures reported by the external `batch_mutate`
//! - `Config`: unreadable or invalid configuration
//!
//! Nothing in this layer retries. [`CassiaError::is_retryable`] only
//! classifies an error so that callers can apply their own policy.

use std::fmt;
use thiserror::Error;

/// Result type alias for cassia operations
pub type CassiaResult<T> = std::result::Result<T, CassiaError>;

/// Boxed source error carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Exception classes a store can report for a rejected request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// The request was malformed or violated the schema
    InvalidRequest,
    /// Not enough replicas were alive to satisfy the consistency level
    Unavailable,
    /// Replicas did not acknowledge in time
    TimedOut,
    /// Any other store-side failure
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreErrorKind::InvalidRequest => "invalid request",
            StoreErrorKind::Unavailable => "unavailable",
            StoreErrorKind::TimedOut => "timed out",
            StoreErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error types for the cassia client layer
#[derive(Debug, Error)]
pub enum CassiaError {
    /// Bytes are not a legal encoding for a data type
    #[error("Decode error ({data_type}): {reason}")]
    Decode {
        /// Name of the data type that failed to decode
        data_type: String,
        /// What was wrong with the input
        reason: String,
    },

    /// A native value has the wrong shape for a data type
    #[error("Encode error ({data_type}): {reason}")]
    Encode {
        /// Name of the data type that refused the value
        data_type: String,
        /// What was wrong with the value
        reason: String,
    },

    /// Data type name not present in the registry
    #[error("Unknown data type: {name}")]
    UnknownType {
        /// The name that failed to resolve
        name: String,
    },

    /// Column input does not match the column family's declared shape
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the mismatch
        message: String,
    },

    /// The transport failed before the store produced an answer
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure
        message: String,
        /// Underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// The store rejected the request
    #[error("Store error ({kind}): {message}")]
    Store {
        /// Exception class reported by the store
        kind: StoreErrorKind,
        /// Message reported by the store
        message: String,
    },

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

impl CassiaError {
    /// Create a decode error for the named data type
    pub fn decode(data_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CassiaError::Decode {
            data_type: data_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an encode error for the named data type
    pub fn encode(data_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CassiaError::Encode {
            data_type: data_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(name: impl Into<String>) -> Self {
        CassiaError::UnknownType { name: name.into() }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        CassiaError::Validation {
            message: message.into(),
        }
    }

    /// Create a transport error without an underlying source
    pub fn transport(message: impl Into<String>) -> Self {
        CassiaError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying source
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        CassiaError::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a store error of the given kind
    pub fn store(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        CassiaError::Store {
            kind,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        CassiaError::Config {
            message: message.into(),
        }
    }

    /// Whether resending the identical payload could succeed
    ///
    /// True for transport failures and for store answers that depend on
    /// cluster state (unavailable replicas, timeouts). Codec, validation and
    /// configuration errors are deterministic and never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            CassiaError::Transport { .. } => true,
            CassiaError::Store { kind, .. } => {
                matches!(kind, StoreErrorKind::Unavailable | StoreErrorKind::TimedOut)
            }
            _ => false,
        }
    }

    /// Whether this error came from the codec layer
    pub fn is_codec(&self) -> bool {
        matches!(
            self,
            CassiaError::Decode { .. } | CassiaError::Encode { .. } | CassiaError::UnknownType { .. }
        )
    }
}
