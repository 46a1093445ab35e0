//! # Error Types
//!
//! Error handling for the document protocol codec.
//!
//! Every failure of an encode or decode call is returned to the immediate
//! caller as a [`ProtocolError`]. Nothing in the codec path logs, retries or
//! substitutes a default value on failure; a malformed message from a peer is
//! an expected outcome, not an exceptional one.
//!
//! ## Error Categories
//! - **Buffer errors**: `BufferUnderrun`, `MalformedValue`
//! - **Dispatch errors**: `UnknownTypeCode` (decode path), `UnsupportedTypeForVersion` (encode path)
//! - **Schema errors**: `SchemaLookupFailed`
//! - **Payload errors**: `EncodeFailed`, `OversizedEncode` (outgoing), `OversizedMessage` (incoming)
//! - **Setup errors**: `UnsupportedGeneration`, `FactoryBinding`, `ConfigError`, `Io`
//!
//! ## Example Usage
//! ```rust
//! use document_protocol::core::buffer::ByteBuffer;
//! use document_protocol::error::ProtocolError;
//!
//! let mut buf = ByteBuffer::new(&[0x00, 0x01]);
//! match buf.read_i32() {
//!     Err(ProtocolError::BufferUnderrun { needed, remaining }) => {
//!         assert_eq!((needed, remaining), (4, 2));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

use crate::protocol::generation::Generation;

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },

    #[error("Malformed value: {0}")]
    MalformedValue(String),

    #[error("Unknown type code {type_code} for protocol generation {generation}")]
    UnknownTypeCode {
        type_code: i32,
        generation: Generation,
    },

    #[error("Type code {type_code} is not supported by protocol generation {generation}")]
    UnsupportedTypeForVersion {
        type_code: i32,
        generation: Generation,
    },

    #[error("Document type lookup failed: '{0}'")]
    SchemaLookupFailed(String),

    #[error("Encode failed: {0}")]
    EncodeFailed(String),

    #[error("Unsupported protocol generation: {0}")]
    UnsupportedGeneration(Generation),

    #[error("Message too large: {size} bytes (max {max})")]
    OversizedMessage { size: usize, max: usize },

    #[error("Encoded message too large: {size} bytes (max {max})")]
    OversizedEncode { size: usize, max: usize },

    #[error("Factory binding error: {0}")]
    FactoryBinding(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Whether this error describes a corrupt or mismatched incoming message
    /// (as opposed to a local programming or setup problem).
    ///
    /// An outgoing frame over the size limit is `OversizedEncode` and is not
    /// counted here.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            ProtocolError::BufferUnderrun { .. }
                | ProtocolError::MalformedValue(_)
                | ProtocolError::UnknownTypeCode { .. }
                | ProtocolError::SchemaLookupFailed(_)
                | ProtocolError::OversizedMessage { .. }
        )
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
