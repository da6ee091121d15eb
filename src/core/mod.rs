//! # Core Encoding Components
//!
//! Binary encoding discipline shared by every cluster participant.
//!
//! ## Components
//! - **Reader**: sequential read cursor with offset tracking and decode limits
//! - **Wire**: fixed-width primitives (integers, booleans, hashes)
//! - **Container**: length-prefixed blobs and sequences, field codecs
//! - **Record**: field-table driven record serializer
//! - **Packet / Codec**: frame envelope and its Tokio codec
//!
//! ## Wire Format
//! ```text
//! integers   fixed width, big-endian
//! bool       1 byte (0x00 / 0x01)
//! hash       32 raw bytes
//! blob       [len(4)] [bytes]
//! sequence   [count(4)] [elements...]
//! frame      [len(4)] [opcode(1)] [rpc_id(8)] [payload]
//! ```
//!
//! ## Security
//! - Every length prefix is bounded before allocation
//! - Truncated input fails cleanly, it never panics

pub mod codec;
pub mod container;
pub mod packet;
pub mod reader;
pub mod record;
pub mod wire;
