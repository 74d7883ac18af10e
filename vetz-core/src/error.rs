//! Error types for the VETZ core library.
//!
//! Tracker operations themselves never fail; rejected calls are silent
//! no-ops. Errors only surface from serialization, configuration, and the
//! host-facing registry helpers.

use thiserror::Error;

/// Top-level error type for all VETZ operations.
#[derive(Error, Debug)]
pub enum VetzError {
    /// The load stream ended before a field could be read.
    #[error("Unexpected end of data: needed {needed} bytes at offset {offset}, {available} available")]
    UnexpectedEof {
        /// Bytes the field required.
        needed: usize,
        /// Stream offset where the read started.
        offset: usize,
        /// Bytes left in the stream.
        available: usize,
    },

    /// A saved block carries a version newer than this build understands.
    #[error("Unsupported xfer version {found} (current: {current})")]
    UnsupportedVersion {
        /// Version tag read from the stream.
        found: u8,
        /// Highest version this build writes.
        current: u8,
    },

    /// The load stream still had data after the last field was read.
    #[error("Trailing data after load: {remaining} bytes")]
    TrailingBytes {
        /// Unconsumed byte count.
        remaining: usize,
    },

    /// Save header magic did not match.
    #[error("Bad save magic: {0:?}")]
    BadMagic([u8; 4]),

    /// Object not found in the registry.
    #[error("Object not found: {0}")]
    ObjectNotFound(crate::ObjectId),

    /// A template name did not resolve.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Every object id has been handed out.
    #[error("Object ids exhausted")]
    IdsExhausted,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, VetzError>;
