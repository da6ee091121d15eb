//! # Error Types
//!
//! Error handling for the cluster wire protocol.
//!
//! Every failure in this crate is local to a single message: a corrupt or
//! hostile frame is reported to the immediate caller and can be dropped
//! without affecting anything else in the process.
//!
//! ## Error Categories
//! - **Decoding**: truncated input, oversized length prefixes, invalid field values
//! - **Registry**: opcodes outside the cluster catalog
//! - **Encoding**: values that do not fit their declared length prefix
//! - **Dispatch**: missing handlers, mismatched handler replies
//! - **Configuration**: invalid or unreadable config files
//!
//! Application-level failures (`error_code` fields inside responses) are
//! *not* errors here. They are successfully decoded messages and this crate
//! only carries them.
//!
//! ## Example Usage
//! ```rust
//! use cluster_protocol::error::ProtocolError;
//! use cluster_protocol::protocol::message::ClusterMessage;
//! use tracing::warn;
//!
//! match ClusterMessage::decode(999, &[]) {
//!     Err(ProtocolError::UnknownOpcode(op)) => warn!(op, "dropping frame"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use crate::protocol::opcode::ClusterOp;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    pub const ERR_PEER_ID_LENGTH: &str = "Peer id must be exactly 4 bytes";
    pub const ERR_PEER_ID_ASCII: &str = "Peer id text must be ASCII";
}

/// ProtocolError is the primary error type for all protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    #[error("Length prefix {count} exceeds limit of {max}")]
    CountOverflow { count: u64, max: usize },

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(u32),

    #[error("Length {len} does not fit a {width}-byte prefix")]
    PrefixOverflow { len: usize, width: usize },

    #[error("Invalid boolean byte: {0:#04x}")]
    InvalidBoolean(u8),

    #[error("Invalid peer id: {0}")]
    InvalidPeerId(String),

    #[error("Invalid shard mask: {0}")]
    InvalidShardMask(u32),

    #[error("Invalid branch: shard size {shard_size}, shard id {shard_id}")]
    InvalidBranch { shard_size: u32, shard_id: u32 },

    #[error("{0} unexpected bytes after record")]
    TrailingBytes(usize),

    #[error("Frame too large: {0} bytes")]
    OversizedFrame(usize),

    #[error("No handler registered for {0}")]
    NoHandler(ClusterOp),

    #[error("Handler replied with {actual}, expected {expected}")]
    UnexpectedResponse {
        expected: ClusterOp,
        actual: ClusterOp,
    },

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Whether the error marks the incoming frame itself as corrupt or hostile.
    ///
    /// Transports use this to decide between dropping a frame and penalizing
    /// the sending connection.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            ProtocolError::TruncatedInput { .. }
                | ProtocolError::CountOverflow { .. }
                | ProtocolError::UnknownOpcode(_)
                | ProtocolError::InvalidBoolean(_)
                | ProtocolError::InvalidShardMask(_)
                | ProtocolError::TrailingBytes(_)
                | ProtocolError::OversizedFrame(_)
        )
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
